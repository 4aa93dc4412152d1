use serde::Serialize;
use std::fmt;
use crate::media_ids::RemoteIds;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HiddenShow {
    pub ids: RemoteIds,
}

/// Trakt list section a hidden item is filed under
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HiddenSection {
    ProgressWatched,
    Recommendations,
}

impl HiddenSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            HiddenSection::ProgressWatched => "progress_watched",
            HiddenSection::Recommendations => "recommendations",
        }
    }
}

impl fmt::Display for HiddenSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a hidden-items request
#[derive(Debug, Serialize)]
pub struct HiddenPayload<'a> {
    pub shows: &'a [HiddenShow],
    pub section: HiddenSection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_wire_names() {
        assert_eq!(
            serde_json::to_string(&HiddenSection::ProgressWatched).unwrap(),
            "\"progress_watched\""
        );
        assert_eq!(HiddenSection::Recommendations.to_string(), "recommendations");
    }
}
