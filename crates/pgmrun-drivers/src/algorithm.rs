use std::fmt;
use std::str::FromStr;

use pgmrun_utils::error::DriverError;

/// External tool family, recognised from the executable path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Libra,
    LearnSdd,
    Gobnilp,
    Bi,
}

impl Algorithm {
    /// Checked in this order; the first substring found in the path wins.
    const MARKERS: [(&'static str, Algorithm); 4] = [
        ("libra", Algorithm::Libra),
        ("LearnSDD", Algorithm::LearnSdd),
        ("gobnilp", Algorithm::Gobnilp),
        ("BI", Algorithm::Bi),
    ];

    /// Recognise the tool family from an executable path.
    ///
    /// ```
    /// use pgmrun_drivers::Algorithm;
    ///
    /// assert_eq!(Algorithm::detect("/opt/libra/bin/libra").unwrap(), Algorithm::Libra);
    /// assert_eq!(Algorithm::detect("tools/BI.jar").unwrap(), Algorithm::Bi);
    /// assert!(Algorithm::detect("weka.jar").is_err());
    /// ```
    pub fn detect(executable: &str) -> Result<Self, DriverError> {
        Self::MARKERS
            .iter()
            .find(|(marker, _)| executable.contains(marker))
            .map(|&(_, algorithm)| algorithm)
            .ok_or_else(|| DriverError::UnsupportedAlgorithm {
                name: executable.to_string(),
            })
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Libra => "libra",
            Self::LearnSdd => "LearnSDD",
            Self::Gobnilp => "gobnilp",
            Self::Bi => "BI",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// libra learner sub-command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraMode {
    Cl,
    BnLearn,
    AcBn,
    AcMn,
    IdSpn,
    MtLearn,
}

impl LibraMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cl => "cl",
            Self::BnLearn => "bnlearn",
            Self::AcBn => "acbn",
            Self::AcMn => "acmn",
            Self::IdSpn => "idspn",
            Self::MtLearn => "mtlearn",
        }
    }

    /// Extension of the model that `mscore` evaluates.
    #[must_use]
    pub const fn model_ext(self) -> &'static str {
        match self {
            Self::Cl | Self::BnLearn => "bn",
            Self::AcBn | Self::AcMn | Self::IdSpn | Self::MtLearn => "ac",
        }
    }

    /// Learns a Bayesian network that must be compiled before querying.
    #[must_use]
    pub const fn learns_network(self) -> bool {
        matches!(self, Self::Cl | Self::BnLearn)
    }

    /// Learns an SPN that `spn2ac` converts to a circuit.
    #[must_use]
    pub const fn learns_spn(self) -> bool {
        matches!(self, Self::IdSpn | Self::MtLearn)
    }

    /// Parse a required `-s` value.
    pub fn require(sub_mode: Option<&str>) -> Result<Self, DriverError> {
        sub_mode
            .ok_or_else(|| DriverError::MissingRequiredInput {
                what: "libra sub-mode (-s cl|bnlearn|acbn|acmn|idspn|mtlearn)".to_string(),
            })?
            .parse()
    }
}

impl FromStr for LibraMode {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cl" => Ok(Self::Cl),
            "bnlearn" => Ok(Self::BnLearn),
            "acbn" => Ok(Self::AcBn),
            "acmn" => Ok(Self::AcMn),
            "idspn" => Ok(Self::IdSpn),
            "mtlearn" => Ok(Self::MtLearn),
            other => Err(DriverError::UnsupportedAlgorithm {
                name: format!("libra {other}"),
            }),
        }
    }
}

impl fmt::Display for LibraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
