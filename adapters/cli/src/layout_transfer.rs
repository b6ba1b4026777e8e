//! Single-line transfer strings for sharing maze layouts.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_pursuit_core::{Grid, Position};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::maze_file::{MazeFileError, MazeLayout};

const LAYOUT_DOMAIN: &str = "maze";
const LAYOUT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const LAYOUT_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

#[derive(Debug, Serialize, Deserialize)]
struct SerializableLayout {
    rows: Vec<String>,
    ghosts: Vec<Position>,
    target: Position,
}

/// Errors that can occur while encoding or decoding layout transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded layout.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The encoded layout did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The encoded layout did not include grid dimensions.
    #[error("layout string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded layout did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The encoded layout used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded layout used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The dimension segment was not `<columns>x<rows>` with non-zero values.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The header dimensions disagree with the decoded floor plan.
    #[error("layout header declares {declared:?} but the maze is {actual:?}")]
    DimensionMismatch {
        /// Columns and rows named in the header.
        declared: (u32, u32),
        /// Columns and rows of the decoded grid.
        actual: (u32, u32),
    },
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse layout payload")]
    InvalidPayload(#[source] serde_json::Error),
    /// The layout could not be serialised into a payload.
    #[error("could not serialize layout payload")]
    Serialize(#[source] serde_json::Error),
    /// The payload decoded but does not describe a usable maze.
    #[error("layout payload describes an invalid maze")]
    InvalidLayout(#[from] MazeFileError),
}

/// Encodes the layout into a single-line string suitable for clipboard transfer.
pub(crate) fn encode(layout: &MazeLayout) -> Result<String, LayoutTransferError> {
    let payload = SerializableLayout {
        rows: layout.grid.to_rows(),
        ghosts: layout.ghosts.clone(),
        target: layout.target,
    };
    let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::Serialize)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{LAYOUT_HEADER}{FIELD_DELIMITER}{}x{}{FIELD_DELIMITER}{encoded}",
        layout.grid.columns(),
        layout.grid.rows()
    ))
}

/// Decodes a layout from its transfer string representation.
pub(crate) fn decode(value: &str) -> Result<MazeLayout, LayoutTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LayoutTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
    let dimensions = parts
        .next()
        .ok_or(LayoutTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

    if domain != LAYOUT_DOMAIN {
        return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != LAYOUT_VERSION {
        return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
    }

    let declared = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LayoutTransferError::InvalidEncoding)?;
    let decoded: SerializableLayout =
        serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

    let grid = Grid::from_rows(&decoded.rows).map_err(MazeFileError::from)?;
    let actual = (grid.columns(), grid.rows());
    if actual != declared {
        return Err(LayoutTransferError::DimensionMismatch { declared, actual });
    }

    Ok(MazeLayout::from_parts(
        grid,
        decoded.ghosts,
        decoded.target,
    )?)
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());

    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;
    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || rows == 0 {
        return Err(invalid());
    }

    Ok((columns, rows))
}
