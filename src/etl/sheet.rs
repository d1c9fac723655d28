/// 选择数据表: 按优先级取第一个存在的表名, 否则取第一个表
/// 仅当工作簿没有任何表时返回 `None`
pub fn select_sheet<'a, S: AsRef<str>>(sheets: &'a [String], preference: &[S]) -> Option<&'a str> {
    preference
        .iter()
        .find_map(|wanted| sheets.iter().find(|name| *name == wanted.as_ref()))
        .or_else(|| sheets.first())
        .map(String::as_str)
}
