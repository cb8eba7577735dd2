//! Input Record Parsing
//!
//! Turns the line-oriented record stream (`request_id,action,object_id[,size,hash]`)
//! into `StoreRequest`s. Parsing is lazy: records are produced one at a time as the
//! router consumes them.

use super::error::InputError;
use crate::storage::protocol::StoreRequest;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parses one record. `line` is the 1-based line number used in diagnostics.
pub fn parse_line(line: u64, record: &str) -> Result<StoreRequest, InputError> {
    let fields: Vec<&str> = record.trim_end_matches(['\r', '\n']).split(',').collect();
    if fields.len() < 3 {
        return Err(InputError::MissingFields {
            line,
            found: fields.len(),
        });
    }

    let (request_id, action, object_id) = (fields[0], fields[1], fields[2]);
    match action {
        "R" => Ok(StoreRequest::read(request_id, object_id)),
        "W" => {
            let (Some(size), Some(hash)) = (fields.get(3), fields.get(4)) else {
                return Err(InputError::IncompleteWrite { line });
            };
            let size = size.trim().parse::<u64>().map_err(|source| InputError::InvalidSize {
                line,
                value: size.to_string(),
                source,
            })?;
            Ok(StoreRequest::write(request_id, object_id, size, *hash))
        }
        other => Err(InputError::UnknownAction {
            line,
            action: other.to_string(),
        }),
    }
}

/// Lazily parses every non-blank line of `reader`.
pub fn read_requests<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<StoreRequest, InputError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(parse_line(index as u64 + 1, &line)),
            Err(e) => Some(Err(InputError::Io(e))),
        })
}

pub fn open_requests(
    path: &Path,
) -> Result<impl Iterator<Item = Result<StoreRequest, InputError>>, InputError> {
    let file = File::open(path)?;
    Ok(read_requests(BufReader::new(file)))
}
