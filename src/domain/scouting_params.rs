use std::fmt;

pub const DEFAULT_PER_QUERY_LIMIT: usize = 5;

/// Which side of a deal the analyst is scouting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Buyers,
    Sellers,
}

impl Profile {
    /// Anything other than "buyers" (any casing) scouts for sellers.
    pub fn from_input(value: &str) -> Self {
        match value.trim().eq_ignore_ascii_case("buyers") {
            true => Profile::Buyers,
            false => Profile::Sellers,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Buyers => "buyers",
            Profile::Sellers => "sellers",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoutingParams {
    pub profile: Profile,
    pub industry: String,
    pub technology: String,
    pub region: String,
    pub deal_size: String,
    pub additional_keywords: String,
    pub per_query_limit: usize,
}

impl ScoutingParams {
    pub fn new(profile: Profile) -> Self {
        ScoutingParams {
            profile,
            industry: String::new(),
            technology: String::new(),
            region: String::new(),
            deal_size: String::new(),
            additional_keywords: String::new(),
            per_query_limit: DEFAULT_PER_QUERY_LIMIT,
        }
    }
}
