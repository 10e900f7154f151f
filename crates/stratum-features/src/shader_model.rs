//! Shader model (target capability level)

use crate::feature_set::FeatureSet;
use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Target shader model, ordered so the highest requirement wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShaderModel {
    major: u8,
    minor: u8,
}

impl ShaderModel {
    pub const SM_3_0: ShaderModel = ShaderModel::new(3, 0);
    pub const SM_3_5: ShaderModel = ShaderModel::new(3, 5);
    pub const SM_4_5: ShaderModel = ShaderModel::new(4, 5);
    pub const SM_4_6: ShaderModel = ShaderModel::new(4, 6);
    pub const SM_5_0: ShaderModel = ShaderModel::new(5, 0);

    /// Tokens that force a minimum model regardless of the active modules
    pub const FORCE_TOKENS: &'static [(&'static str, ShaderModel)] = &[
        ("_FORCEMODEL46", ShaderModel::SM_4_6),
        ("_FORCEMODEL50", ShaderModel::SM_5_0),
    ];

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u8 {
        self.major
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }

    /// Highest model forced by a force token in `features`
    pub fn forced_by(features: &FeatureSet) -> Option<ShaderModel> {
        Self::FORCE_TOKENS
            .iter()
            .filter(|(token, _)| features.contains(token))
            .map(|(_, model)| *model)
            .max()
    }
}

impl fmt::Display for ShaderModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ShaderModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::Config(format!("invalid shader model '{}'", s));
        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        let major = major.parse().map_err(|_| invalid())?;
        let minor = minor.parse().map_err(|_| invalid())?;
        Ok(ShaderModel::new(major, minor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(ShaderModel::SM_3_5 < ShaderModel::SM_4_5);
        assert!(ShaderModel::SM_4_6 < ShaderModel::SM_5_0);
        assert_eq!(
            [ShaderModel::SM_4_6, ShaderModel::SM_3_5].into_iter().max(),
            Some(ShaderModel::SM_4_6)
        );
    }

    #[test]
    fn test_parse_and_display() {
        let model: ShaderModel = "4.6".parse().unwrap();
        assert_eq!(model, ShaderModel::SM_4_6);
        assert_eq!(model.to_string(), "4.6");
        assert!("46".parse::<ShaderModel>().is_err());
        assert!("a.b".parse::<ShaderModel>().is_err());
    }

    #[test]
    fn test_forced_by_picks_highest() {
        let features: FeatureSet = ["_FORCEMODEL46", "_FORCEMODEL50"].into_iter().collect();
        assert_eq!(ShaderModel::forced_by(&features), Some(ShaderModel::SM_5_0));
        assert_eq!(ShaderModel::forced_by(&FeatureSet::new()), None);
    }
}
