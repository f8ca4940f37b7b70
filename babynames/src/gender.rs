use serde::Serialize;

/// Gender as stored in the `gender` key attribute of the names table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Gender {
    #[serde(rename = "B")]
    Boy,
    #[serde(rename = "G")]
    Girl,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Boy, Gender::Girl];

    pub fn code(self) -> &'static str {
        match self {
            Gender::Boy => "B",
            Gender::Girl => "G",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Boy => "Boy",
            Gender::Girl => "Girl",
        }
    }

    pub fn from_code(code: &str) -> Option<Gender> {
        match code {
            "B" => Some(Gender::Boy),
            "G" => Some(Gender::Girl),
            _ => None,
        }
    }
}

/// The gender segment of a request. Anything that isn't `B` or `G` means
/// "either".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenderFilter {
    Only(Gender),
    Either,
}

impl GenderFilter {
    pub fn parse(value: &str) -> GenderFilter {
        match Gender::from_code(value) {
            Some(gender) => GenderFilter::Only(gender),
            None => GenderFilter::Either,
        }
    }

    pub fn candidates(&self) -> &'static [Gender] {
        match self {
            GenderFilter::Only(Gender::Boy) => &[Gender::Boy],
            GenderFilter::Only(Gender::Girl) => &[Gender::Girl],
            GenderFilter::Either => &Gender::ALL,
        }
    }
}
