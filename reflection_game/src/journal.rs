// Journal persistence hooks.
//
// The host shell persists activity state as string metadata: it calls the
// write hook once at shutdown and the read hook once at startup when prior
// metadata exists. Two keys are used:
//
//   orientation  the orientation's lowercase string form
//   dotlist      the dot list as space-separated decimal integers
//
// No escaping is needed — both values are integers or fixed enum strings.
// A missing `dotlist` key means no saved game (fresh start); a missing
// `orientation` key defaults to horizontal, matching the deployed behavior
// of older saves that predate the orientation key.

use std::collections::BTreeMap;

use reflection_protocol::types::{ColorState, Orientation, ParseOrientationError};

use crate::grid::GameState;

/// Metadata key for the serialized dot list.
pub const KEY_DOTLIST: &str = "dotlist";
/// Metadata key for the orientation string.
pub const KEY_ORIENTATION: &str = "orientation";

/// Corrupt saved metadata. Surfaced to the host rather than silently
/// producing a wrong grid.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("bad dot value {value:?} in saved dotlist")]
    BadDot {
        value: String,
        source: std::num::ParseIntError,
    },
    #[error(transparent)]
    BadOrientation(#[from] ParseOrientationError),
}

/// Shutdown hook: record the current grid under the two metadata keys.
pub fn write_metadata(game: &GameState, metadata: &mut BTreeMap<String, String>) {
    let (dots, orientation) = game.save();
    metadata.insert(KEY_ORIENTATION.to_string(), orientation.to_string());
    let dotlist = dots
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    metadata.insert(KEY_DOTLIST.to_string(), dotlist);
}

/// Startup hook: parse saved metadata back into a `(dot_list, orientation)`
/// pair. `Ok(None)` when there is no saved game.
pub fn read_metadata(
    metadata: &BTreeMap<String, String>,
) -> Result<Option<(Vec<ColorState>, Orientation)>, JournalError> {
    let Some(dotlist) = metadata.get(KEY_DOTLIST) else {
        return Ok(None);
    };

    let orientation = match metadata.get(KEY_ORIENTATION) {
        Some(s) => s.parse()?,
        None => Orientation::Horizontal,
    };

    let dots = dotlist
        .split_whitespace()
        .map(|value| {
            value.parse().map_err(|source| JournalError::BadDot {
                value: value.to_string(),
                source,
            })
        })
        .collect::<Result<Vec<ColorState>, _>>()?;

    Ok(Some((dots, orientation)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_roundtrip() {
        let mut game = GameState::new(Orientation::Horizontal);
        game.restore(vec![1, 0, 1], Orientation::Bilateral);

        let mut metadata = BTreeMap::new();
        write_metadata(&game, &mut metadata);
        assert_eq!(metadata.get(KEY_DOTLIST).unwrap(), "1 0 1");
        assert_eq!(metadata.get(KEY_ORIENTATION).unwrap(), "bilateral");

        let (dots, orientation) = read_metadata(&metadata).unwrap().unwrap();
        assert_eq!(dots, vec![1, 0, 1]);
        assert_eq!(orientation, Orientation::Bilateral);
    }

    #[test]
    fn missing_dotlist_means_no_saved_game() {
        let metadata = BTreeMap::new();
        assert!(read_metadata(&metadata).unwrap().is_none());
    }

    #[test]
    fn missing_orientation_defaults_to_horizontal() {
        let mut metadata = BTreeMap::new();
        metadata.insert(KEY_DOTLIST.to_string(), "2 3 0 1".to_string());

        let (dots, orientation) = read_metadata(&metadata).unwrap().unwrap();
        assert_eq!(dots, vec![2, 3, 0, 1]);
        assert_eq!(orientation, Orientation::Horizontal);
    }

    #[test]
    fn corrupt_dot_value_is_an_error() {
        let mut metadata = BTreeMap::new();
        metadata.insert(KEY_DOTLIST.to_string(), "1 zap 3".to_string());
        metadata.insert(KEY_ORIENTATION.to_string(), "vertical".to_string());

        let err = read_metadata(&metadata).unwrap_err();
        assert!(matches!(err, JournalError::BadDot { value, .. } if value == "zap"));
    }

    #[test]
    fn unknown_orientation_is_an_error() {
        let mut metadata = BTreeMap::new();
        metadata.insert(KEY_DOTLIST.to_string(), "0".to_string());
        metadata.insert(KEY_ORIENTATION.to_string(), "diagonal".to_string());

        assert!(matches!(
            read_metadata(&metadata),
            Err(JournalError::BadOrientation(_))
        ));
    }

    #[test]
    fn empty_dotlist_restores_empty_grid() {
        let mut metadata = BTreeMap::new();
        metadata.insert(KEY_DOTLIST.to_string(), String::new());
        metadata.insert(KEY_ORIENTATION.to_string(), "horizontal".to_string());

        let (dots, _) = read_metadata(&metadata).unwrap().unwrap();
        assert!(dots.is_empty());
    }
}
