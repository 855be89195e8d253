use beacon_composer_common::ComposerError;
use std::fmt;
use std::str::FromStr;

/// The Braze REST endpoint clusters an account can live on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrazeRegion {
    Us01,
    Us02,
    Us03,
    Us04,
    Us05,
    Us06,
    Us08,
    Eu01,
    Eu02,
}

const ALL_REGIONS: [BrazeRegion; 9] = [
    BrazeRegion::Us01,
    BrazeRegion::Us02,
    BrazeRegion::Us03,
    BrazeRegion::Us04,
    BrazeRegion::Us05,
    BrazeRegion::Us06,
    BrazeRegion::Us08,
    BrazeRegion::Eu01,
    BrazeRegion::Eu02,
];

impl BrazeRegion {
    pub fn all() -> impl Iterator<Item = BrazeRegion> {
        ALL_REGIONS.into_iter()
    }

    /// The region code as shown in the Braze dashboard, e.g. `US-03`.
    pub fn code(&self) -> &'static str {
        match self {
            BrazeRegion::Us01 => "US-01",
            BrazeRegion::Us02 => "US-02",
            BrazeRegion::Us03 => "US-03",
            BrazeRegion::Us04 => "US-04",
            BrazeRegion::Us05 => "US-05",
            BrazeRegion::Us06 => "US-06",
            BrazeRegion::Us08 => "US-08",
            BrazeRegion::Eu01 => "EU-01",
            BrazeRegion::Eu02 => "EU-02",
        }
    }

    /// The REST API base URL, without trailing slash.
    pub fn base_url(&self) -> &'static str {
        match self {
            BrazeRegion::Us01 => "https://rest.iad-01.braze.com",
            BrazeRegion::Us02 => "https://rest.iad-02.braze.com",
            BrazeRegion::Us03 => "https://rest.iad-03.braze.com",
            BrazeRegion::Us04 => "https://rest.iad-04.braze.com",
            BrazeRegion::Us05 => "https://rest.iad-05.braze.com",
            BrazeRegion::Us06 => "https://rest.iad-06.braze.com",
            BrazeRegion::Us08 => "https://rest.iad-08.braze.com",
            BrazeRegion::Eu01 => "https://rest.fra-01.braze.eu",
            BrazeRegion::Eu02 => "https://rest.fra-02.braze.eu",
        }
    }
}

impl fmt::Display for BrazeRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BrazeRegion {
    type Err = ComposerError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        BrazeRegion::all().find(|region| region.code() == code).ok_or_else(|| {
            ComposerError::ConfigurationError {
                message: format!(
                    "Unknown Braze endpoint region [{}]. Valid values are: {}",
                    code,
                    BrazeRegion::all().map(|region| region.code()).collect::<Vec<_>>().join(", ")
                ),
            }
        })
    }
}
