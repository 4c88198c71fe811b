/// Finds the extent of the brace-balanced template starting at `start_index`,
/// which must point at an opening `{{`. Returns the byte length of the
/// template, so `&text[start_index..start_index + length]` is the whole
/// `{{...}}` run.
///
/// Braces inside `<!--...-->` comment spans never affect the count. An
/// unterminated template degrades to the rest of the string rather than
/// failing; callers treat that as a best-effort match.
pub fn template_bounds(text: &str, start_index: usize) -> usize {
    let bytes = text.as_bytes();
    let mut length = 2usize;
    let mut open_count = 2i32;
    let mut in_comment = false;

    while open_count != 0 && start_index + length < bytes.len() {
        let index = start_index + length;
        let rest = &bytes[index..];

        if rest.starts_with(b"<!--") {
            in_comment = true;
            length += 3;
        } else if rest.starts_with(b"-->") {
            in_comment = false;
            length += 2;
        } else if !in_comment {
            if rest.starts_with(b"{{") {
                open_count += 2;
                length += 1;
            } else if rest.starts_with(b"}}") {
                open_count -= 2;
                length += 1;
            }
        }

        length += 1;
    }

    length
}
