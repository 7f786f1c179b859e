//! Comma splitting shared by the `-l` and `-W` parsers.
//!
//! Quotes (`'` or `"`) protect commas and `=` until the matching quote.

/// One comma-separated piece of the input and its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Segment<'a> {
    pub(super) offset: usize,
    pub(super) text: &'a str,
}

/// Splits on unquoted commas. Returns the offset of the opening quote when a
/// quote is never closed.
pub(super) fn split_unquoted(text: &str) -> Result<Vec<Segment<'_>>, usize> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut quote: Option<(char, usize)> = None;

    for (index, character) in text.char_indices() {
        match quote {
            Some((open, _)) if character == open => quote = None,
            Some(_) => {}
            None if matches!(character, '"' | '\'') => quote = Some((character, index)),
            None if character == ',' => {
                segments.push(Segment {
                    offset: start,
                    text: &text[start..index],
                });
                start = index + 1;
            }
            None => {}
        }
    }

    if let Some((_, position)) = quote {
        return Err(position);
    }
    segments.push(Segment {
        offset: start,
        text: &text[start..],
    });
    Ok(segments)
}

/// Byte offset of the first unquoted occurrence of `target`.
pub(super) fn find_unquoted(text: &str, target: char) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (index, character) in text.char_indices() {
        match quote {
            Some(open) if character == open => quote = None,
            Some(_) => {}
            None if matches!(character, '"' | '\'') => quote = Some(character),
            None if character == target => return Some(index),
            None => {}
        }
    }
    None
}

/// Strips one pair of matching surrounding quotes.
pub(super) fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
