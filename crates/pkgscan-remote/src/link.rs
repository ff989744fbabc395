/// Returns the target of the `rel="next"` entry of a `Link` header.
///
/// # Examples
///
/// ```
/// use pkgscan_remote::link::next_link;
///
/// let header = r#"<https://h/api?page=1>; rel="prev", <https://h/api?id_after=9>; rel="next""#;
/// assert_eq!(next_link(header).as_deref(), Some("https://h/api?id_after=9"));
/// assert_eq!(next_link(r#"<https://h/api>; rel="first""#), None);
/// ```
pub fn next_link(header: &str) -> Option<String> {
    split_entries(header).into_iter().find_map(|entry| {
        let (target, params) = entry.trim().strip_prefix('<')?.split_once('>')?;

        let is_next = params.split(';').any(|param| {
            let Some((key, value)) = param.split_once('=') else {
                return false;
            };
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case("next"))
        });

        is_next.then(|| target.to_string())
    })
}

/// Splits a `Link` header on the commas that separate entries, leaving
/// commas inside `<...>` targets and quoted parameter values alone.
fn split_entries(header: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut in_target = false;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in header.char_indices() {
        match c {
            '<' if !in_quotes => in_target = true,
            '>' if !in_quotes => in_target = false,
            '"' if !in_target => in_quotes = !in_quotes,
            ',' if !in_target && !in_quotes => {
                entries.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&header[start..]);
    entries
}
