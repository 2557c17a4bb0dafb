//! Display strings for score factors and card reasons.
//!
//! The engine only emits language-neutral codes; routes render them here
//! after matching.

use crate::models::{MatchReason, ScoreFactor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Th,
    En,
}

impl Locale {
    /// Unknown or missing locales fall back to Thai
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "en" || v.starts_with("en-") => Locale::En,
            _ => Locale::Th,
        }
    }
}

pub fn factor_label(factor: ScoreFactor, locale: Locale) -> &'static str {
    match (factor, locale) {
        (ScoreFactor::BudgetFit, Locale::Th) => "ความเหมาะสมกับงบประมาณ",
        (ScoreFactor::BudgetFit, Locale::En) => "Budget fit",
        (ScoreFactor::AreaMatch, Locale::Th) => "ทำเลที่ต้องการ",
        (ScoreFactor::AreaMatch, Locale::En) => "Preferred area",
        (ScoreFactor::TransitProximity, Locale::Th) => "ใกล้รถไฟฟ้า",
        (ScoreFactor::TransitProximity, Locale::En) => "Near mass transit",
        (ScoreFactor::CommuteTime, Locale::Th) => "เวลาเดินทาง",
        (ScoreFactor::CommuteTime, Locale::En) => "Commute time",
        (ScoreFactor::TypeMatch, Locale::Th) => "ประเภททรัพย์ตรงความต้องการ",
        (ScoreFactor::TypeMatch, Locale::En) => "Property type",
    }
}

pub fn reason_text(reason: MatchReason, locale: Locale) -> &'static str {
    match (reason, locale) {
        (MatchReason::WithinBudget, Locale::Th) => "ในงบประมาณที่ตั้งไว้",
        (MatchReason::WithinBudget, Locale::En) => "Within your budget",
        (MatchReason::CloseToBudget, Locale::Th) => "ใกล้เคียงงบประมาณ",
        (MatchReason::CloseToBudget, Locale::En) => "Close to your budget",
        (MatchReason::InPreferredArea, Locale::Th) => "อยู่ในทำเลที่ต้องการ",
        (MatchReason::InPreferredArea, Locale::En) => "In your preferred area",
        (MatchReason::NearPreferredArea, Locale::Th) => "ใกล้ทำเลที่ต้องการ",
        (MatchReason::NearPreferredArea, Locale::En) => "Near your preferred area",
        (MatchReason::NearTransit, Locale::Th) => "ใกล้รถไฟฟ้า",
        (MatchReason::NearTransit, Locale::En) => "Close to mass transit",
        (MatchReason::ShortCommute, Locale::Th) => "เดินทางสะดวก",
        (MatchReason::ShortCommute, Locale::En) => "Short commute",
        (MatchReason::MatchesPropertyType, Locale::Th) => "ตรงประเภทที่ต้องการ",
        (MatchReason::MatchesPropertyType, Locale::En) => "Matches your property type",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parse() {
        assert_eq!(Locale::parse(None), Locale::Th);
        assert_eq!(Locale::parse(Some("EN")), Locale::En);
        assert_eq!(Locale::parse(Some("en-US")), Locale::En);
        assert_eq!(Locale::parse(Some("fr")), Locale::Th);
    }

    #[test]
    fn test_reason_text() {
        assert_eq!(reason_text(MatchReason::WithinBudget, Locale::Th), "ในงบประมาณที่ตั้งไว้");
        assert_eq!(reason_text(MatchReason::NearPreferredArea, Locale::Th), "ใกล้ทำเลที่ต้องการ");
        assert_eq!(factor_label(ScoreFactor::CommuteTime, Locale::En), "Commute time");
    }
}
