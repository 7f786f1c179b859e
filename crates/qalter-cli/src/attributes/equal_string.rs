//! Keyword list parsing for `-W`: `keyword=value[,keyword=value...]`.
//!
//! A value runs up to the last comma before the next unquoted `=`, so
//! `group_list=staff,admin,umask=022` yields two pairs.

use thiserror::Error;

use super::split::{find_unquoted, split_unquoted, unquote};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum EqualStringError {
    #[error("keyword expected at offset {0}")]
    MissingKeyword(usize),
    #[error("'=' expected at offset {0}")]
    MissingEquals(usize),
    #[error("illegal character in keyword at offset {0}")]
    IllegalKeyword(usize),
    #[error("unterminated quoted value at offset {0}")]
    UnterminatedQuote(usize),
}

/// Parses the whole list; pairs are returned in input order.
pub(crate) fn parse_keyword_pairs(text: &str) -> Result<Vec<(String, String)>, EqualStringError> {
    let segments = split_unquoted(text).map_err(EqualStringError::UnterminatedQuote)?;
    let mut pairs: Vec<(String, String)> = Vec::new();

    for segment in segments {
        let Some(equals) = find_unquoted(segment.text, '=') else {
            match pairs.last_mut() {
                Some((_, value)) => {
                    value.push(',');
                    value.push_str(segment.text);
                    continue;
                }
                None => {
                    return Err(EqualStringError::MissingEquals(
                        segment.offset + segment.text.len(),
                    ));
                }
            }
        };

        let raw_keyword = &segment.text[..equals];
        let keyword = raw_keyword.trim_start();
        let keyword_start = segment.offset + (raw_keyword.len() - keyword.len());
        if keyword.is_empty() {
            return Err(EqualStringError::MissingKeyword(keyword_start));
        }
        if let Some((index, _)) = keyword
            .char_indices()
            .find(|(_, character)| !(character.is_ascii_alphanumeric() || *character == '_'))
        {
            return Err(EqualStringError::IllegalKeyword(keyword_start + index));
        }
        pairs.push((keyword.to_owned(), segment.text[equals + 1..].to_owned()));
    }

    Ok(pairs
        .into_iter()
        .map(|(keyword, value)| {
            let value = unquote(value.trim()).to_owned();
            (keyword, value)
        })
        .collect())
}
