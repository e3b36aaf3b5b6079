//! Participant identity: display name plus the markers drawn for them.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub vessel_mark: char,
    pub hit_mark: char,
}

impl Participant {
    pub fn new(name: &str, vessel_mark: char, hit_mark: char) -> Self {
        Participant {
            name: name.to_string(),
            vessel_mark,
            hit_mark,
        }
    }
}
