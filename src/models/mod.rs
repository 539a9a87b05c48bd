pub mod person;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

pub use person::{
    normalize_handle, parse_person_key, person_key, Person, PersonPatch, Platform,
    ProfileDetails, RelationshipFlag, TimelineKind, TimelinePost,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provenance {
    Ai,
    Heuristic,
}
