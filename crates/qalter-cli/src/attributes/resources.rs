//! Resource-list parsing for `-l`: `name=value[,name=value...]`.
//!
//! Values are opaque (a `select` statement may itself contain `:` and `=`),
//! may be quoted to protect commas, and may be empty to unset a resource.

use thiserror::Error;

use super::split::{split_unquoted, unquote};

/// One `name=value` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResourceRequest {
    pub(crate) name: String,
    pub(crate) value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ResourceListError {
    /// Nothing to parse; reported without a position.
    #[error("resource list is empty")]
    Empty,
    #[error("{reason} at offset {position}")]
    Syntax {
        position: usize,
        reason: ResourceSyntax,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum ResourceSyntax {
    #[error("resource name expected")]
    MissingName,
    #[error("'=' expected after resource name")]
    MissingEquals,
    #[error("illegal character in resource name")]
    IllegalName,
    #[error("unterminated quoted value")]
    UnterminatedQuote,
}

pub(crate) fn parse_resource_list(text: &str) -> Result<Vec<ResourceRequest>, ResourceListError> {
    if text.trim().is_empty() {
        return Err(ResourceListError::Empty);
    }

    let segments = split_unquoted(text).map_err(|position| ResourceListError::Syntax {
        position,
        reason: ResourceSyntax::UnterminatedQuote,
    })?;

    segments
        .into_iter()
        .map(|segment| {
            let body = segment.text.trim_start();
            let start = segment.offset + (segment.text.len() - body.len());
            parse_item(body.trim_end(), start)
        })
        .collect()
}

fn parse_item(body: &str, start: usize) -> Result<ResourceRequest, ResourceListError> {
    let syntax = |position: usize, reason: ResourceSyntax| ResourceListError::Syntax {
        position,
        reason,
    };

    let (name, value) = match body.split_once('=') {
        Some(parts) => parts,
        None if body.is_empty() => return Err(syntax(start, ResourceSyntax::MissingName)),
        None => (body, ""),
    };
    if name.is_empty() {
        return Err(syntax(start, ResourceSyntax::MissingName));
    }
    if let Some((index, _)) = name
        .char_indices()
        .find(|(_, character)| !is_name_character(*character))
    {
        return Err(syntax(start + index, ResourceSyntax::IllegalName));
    }
    if !body.contains('=') {
        return Err(syntax(start + body.len(), ResourceSyntax::MissingEquals));
    }

    Ok(ResourceRequest {
        name: name.to_owned(),
        value: unquote(value.trim()).to_owned(),
    })
}

const fn is_name_character(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '_' | '-')
}
