//! Facet names, range tokens, sort modes and the value vocabulary.
//!
//! Every enum here has a stable string token. Those tokens are what appears
//! in the address bar, so renaming one breaks every bookmarked search.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Multi-select facets. Declaration order is the order keys appear in an
/// encoded address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoricalFacet {
    Stream,
    Degree,
    Specialization,
    State,
    City,
    LocationType,
    Ownership,
    Management,
    InstitutionCategory,
    CollegeType,
}

impl CategoricalFacet {
    pub const ALL: [CategoricalFacet; 10] = [
        CategoricalFacet::Stream,
        CategoricalFacet::Degree,
        CategoricalFacet::Specialization,
        CategoricalFacet::State,
        CategoricalFacet::City,
        CategoricalFacet::LocationType,
        CategoricalFacet::Ownership,
        CategoricalFacet::Management,
        CategoricalFacet::InstitutionCategory,
        CategoricalFacet::CollegeType,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CategoricalFacet::Stream => "stream",
            CategoricalFacet::Degree => "degree",
            CategoricalFacet::Specialization => "specialization",
            CategoricalFacet::State => "state",
            CategoricalFacet::City => "city",
            CategoricalFacet::LocationType => "locationType",
            CategoricalFacet::Ownership => "ownership",
            CategoricalFacet::Management => "management",
            CategoricalFacet::InstitutionCategory => "institutionCategory",
            CategoricalFacet::CollegeType => "collegeType",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|facet| facet.key() == key)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CategoricalFacet::Stream => "Stream",
            CategoricalFacet::Degree => "Degree",
            CategoricalFacet::Specialization => "Specialization",
            CategoricalFacet::State => "State",
            CategoricalFacet::City => "City",
            CategoricalFacet::LocationType => "Location Type",
            CategoricalFacet::Ownership => "Ownership",
            CategoricalFacet::Management => "Management",
            CategoricalFacet::InstitutionCategory => "Institution Category",
            CategoricalFacet::CollegeType => "College Type",
        }
    }
}

impl std::fmt::Display for CategoricalFacet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Single-choice bucketed facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeFacet {
    Fees,
    Rating,
}

impl RangeFacet {
    pub const ALL: [RangeFacet; 2] = [RangeFacet::Fees, RangeFacet::Rating];

    pub fn key(self) -> &'static str {
        match self {
            RangeFacet::Fees => "fees",
            RangeFacet::Rating => "rating",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|facet| facet.key() == key)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RangeFacet::Fees => "Annual Fees",
            RangeFacet::Rating => "Rating",
        }
    }

    /// All tokens this facet accepts, in display order.
    pub fn tokens(self) -> Vec<RangeToken> {
        match self {
            RangeFacet::Fees => FeeBracket::ALL.into_iter().map(RangeToken::Fees).collect(),
            RangeFacet::Rating => MinRating::ALL.into_iter().map(RangeToken::Rating).collect(),
        }
    }
}

impl std::fmt::Display for RangeFacet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeeBracket {
    #[serde(rename = "under-1l")]
    UnderOneLakh,
    #[serde(rename = "1l-3l")]
    OneToThreeLakh,
    #[serde(rename = "3l-5l")]
    ThreeToFiveLakh,
    #[serde(rename = "5l-10l")]
    FiveToTenLakh,
    #[serde(rename = "above-10l")]
    AboveTenLakh,
}

impl FeeBracket {
    pub const ALL: [FeeBracket; 5] = [
        FeeBracket::UnderOneLakh,
        FeeBracket::OneToThreeLakh,
        FeeBracket::ThreeToFiveLakh,
        FeeBracket::FiveToTenLakh,
        FeeBracket::AboveTenLakh,
    ];

    pub fn token(self) -> &'static str {
        match self {
            FeeBracket::UnderOneLakh => "under-1l",
            FeeBracket::OneToThreeLakh => "1l-3l",
            FeeBracket::ThreeToFiveLakh => "3l-5l",
            FeeBracket::FiveToTenLakh => "5l-10l",
            FeeBracket::AboveTenLakh => "above-10l",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FeeBracket::UnderOneLakh => "Below ₹1 Lakh",
            FeeBracket::OneToThreeLakh => "₹1 - 3 Lakh",
            FeeBracket::ThreeToFiveLakh => "₹3 - 5 Lakh",
            FeeBracket::FiveToTenLakh => "₹5 - 10 Lakh",
            FeeBracket::AboveTenLakh => "Above ₹10 Lakh",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MinRating {
    #[serde(rename = "3-plus")]
    ThreePlus,
    #[serde(rename = "4-plus")]
    FourPlus,
    #[serde(rename = "4.5-plus")]
    FourHalfPlus,
}

impl MinRating {
    pub const ALL: [MinRating; 3] = [MinRating::ThreePlus, MinRating::FourPlus, MinRating::FourHalfPlus];

    pub fn token(self) -> &'static str {
        match self {
            MinRating::ThreePlus => "3-plus",
            MinRating::FourPlus => "4-plus",
            MinRating::FourHalfPlus => "4.5-plus",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MinRating::ThreePlus => "3+ stars",
            MinRating::FourPlus => "4+ stars",
            MinRating::FourHalfPlus => "4.5+ stars",
        }
    }
}

/// The active bucket of one range facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeToken {
    Fees(FeeBracket),
    Rating(MinRating),
}

impl RangeToken {
    pub fn facet(self) -> RangeFacet {
        match self {
            RangeToken::Fees(_) => RangeFacet::Fees,
            RangeToken::Rating(_) => RangeFacet::Rating,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            RangeToken::Fees(bracket) => bracket.token(),
            RangeToken::Rating(rating) => rating.token(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RangeToken::Fees(bracket) => bracket.label(),
            RangeToken::Rating(rating) => rating.label(),
        }
    }

    /// Parses a token in the context of its facet. Tokens are matched
    /// exactly; anything else is `None`.
    pub fn parse(facet: RangeFacet, token: &str) -> Option<Self> {
        facet.tokens().into_iter().find(|candidate| candidate.token() == token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum SortMode {
    #[default]
    #[serde(rename = "popularity")]
    Popularity,
    #[serde(rename = "rating")]
    Rating,
    #[serde(rename = "fees-asc")]
    FeesLowToHigh,
    #[serde(rename = "fees-desc")]
    FeesHighToLow,
    #[serde(rename = "name")]
    Name,
}

impl SortMode {
    pub const ALL: [SortMode; 5] = [
        SortMode::Popularity,
        SortMode::Rating,
        SortMode::FeesLowToHigh,
        SortMode::FeesHighToLow,
        SortMode::Name,
    ];

    pub fn token(self) -> &'static str {
        match self {
            SortMode::Popularity => "popularity",
            SortMode::Rating => "rating",
            SortMode::FeesLowToHigh => "fees-asc",
            SortMode::FeesHighToLow => "fees-desc",
            SortMode::Name => "name",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.token() == token)
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Popularity => "Popularity",
            SortMode::Rating => "Highest rated",
            SortMode::FeesLowToHigh => "Fees: low to high",
            SortMode::FeesHighToLow => "Fees: high to low",
            SortMode::Name => "Name",
        }
    }
}

/// Known values for each categorical facet.
///
/// Lookups are case-insensitive and return the canonical spelling, so
/// `?city=pune` and `?city=Pune` decode to the same state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<CategoricalFacet, Vec<String>>", into = "BTreeMap<CategoricalFacet, Vec<String>>")]
pub struct FacetVocabulary {
    values: BTreeMap<CategoricalFacet, Vec<String>>,
}

impl From<BTreeMap<CategoricalFacet, Vec<String>>> for FacetVocabulary {
    fn from(values: BTreeMap<CategoricalFacet, Vec<String>>) -> Self {
        Self::from_values(values)
    }
}

impl From<FacetVocabulary> for BTreeMap<CategoricalFacet, Vec<String>> {
    fn from(vocabulary: FacetVocabulary) -> Self {
        vocabulary.values
    }
}

impl Default for FacetVocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FacetVocabulary {
    /// Builds a vocabulary, trimming values and dropping blanks and
    /// case-insensitive duplicates (first spelling wins).
    pub fn from_values(values: BTreeMap<CategoricalFacet, Vec<String>>) -> Self {
        let values = values
            .into_iter()
            .map(|(facet, raw_values)| {
                let mut seen = BTreeSet::new();
                let cleaned = raw_values
                    .into_iter()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty() && seen.insert(v.to_lowercase()))
                    .collect::<Vec<_>>();
                (facet, cleaned)
            })
            .collect();
        Self { values }
    }

    pub fn values(&self, facet: CategoricalFacet) -> &[String] {
        self.values.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Canonical spelling of `raw` if it belongs to the facet.
    pub fn canonicalize(&self, facet: CategoricalFacet, raw: &str) -> Option<&str> {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.values(facet)
            .iter()
            .find(|known| known.to_lowercase() == needle)
            .map(String::as_str)
    }

    pub fn contains(&self, facet: CategoricalFacet, raw: &str) -> bool {
        self.canonicalize(facet, raw).is_some()
    }

    /// The catalog shipped with the site.
    pub fn builtin() -> Self {
        let table: [(CategoricalFacet, &[&str]); 10] = [
            (CategoricalFacet::Stream, &[
                "Engineering", "Management", "Medical", "Dental", "Pharmacy", "Nursing",
                "Law", "Science", "Commerce", "Arts", "Design", "Architecture",
                "Agriculture", "Computer Applications", "Hotel Management", "Education",
                "Mass Communication", "Paramedical",
            ]),
            (CategoricalFacet::Degree, &[
                "B.Tech", "B.E.", "M.Tech", "MBA", "PGDM", "MBBS", "BDS", "B.Pharm",
                "M.Pharm", "B.Sc Nursing", "LLB", "LLM", "B.Sc", "M.Sc", "B.Com", "M.Com",
                "BA", "MA", "BBA", "BCA", "MCA", "B.Des", "B.Arch", "B.Ed", "Ph.D", "Diploma",
            ]),
            (CategoricalFacet::Specialization, &[
                "Computer Science", "Information Technology", "Mechanical Engineering",
                "Civil Engineering", "Electrical Engineering", "Electronics and Communication",
                "Chemical Engineering", "Aerospace Engineering", "Biotechnology",
                "Data Science", "Artificial Intelligence", "Finance", "Marketing",
                "Human Resources", "Operations", "Business Analytics", "International Business",
            ]),
            (CategoricalFacet::State, &[
                "Andhra Pradesh", "Arunachal Pradesh", "Assam", "Bihar", "Chhattisgarh",
                "Goa", "Gujarat", "Haryana", "Himachal Pradesh", "Jharkhand", "Karnataka",
                "Kerala", "Madhya Pradesh", "Maharashtra", "Manipur", "Meghalaya", "Mizoram",
                "Nagaland", "Odisha", "Punjab", "Rajasthan", "Sikkim", "Tamil Nadu",
                "Telangana", "Tripura", "Uttar Pradesh", "Uttarakhand", "West Bengal",
                "Delhi", "Chandigarh", "Jammu and Kashmir", "Ladakh", "Puducherry",
            ]),
            (CategoricalFacet::City, &[
                "Mumbai", "New Delhi", "Bangalore", "Chennai", "Hyderabad", "Kolkata",
                "Pune", "Ahmedabad", "Jaipur", "Lucknow", "Chandigarh", "Bhopal", "Indore",
                "Nagpur", "Coimbatore", "Kochi", "Thiruvananthapuram", "Bhubaneswar",
                "Patna", "Guwahati", "Dehradun", "Noida", "Gurgaon", "Vellore", "Manipal",
                "Mysore", "Visakhapatnam", "Vadodara", "Surat", "Kanpur", "Varanasi",
                "Roorkee", "Kharagpur", "Warangal", "Tiruchirappalli", "Mangalore",
                "Nashik", "Ranchi", "Raipur", "Jodhpur", "Srinagar", "Shimla",
            ]),
            (CategoricalFacet::LocationType, &["Urban", "Semi-Urban", "Rural"]),
            (CategoricalFacet::Ownership, &[
                "Government", "Private", "Semi-Government", "Public-Private Partnership",
            ]),
            (CategoricalFacet::Management, &[
                "Central Government", "State Government", "Private Unaided", "Private Aided",
                "Autonomous", "Trust", "Society",
            ]),
            (CategoricalFacet::InstitutionCategory, &[
                "University", "Deemed University", "Institute of National Importance",
                "Autonomous College", "Affiliated College", "Standalone Institution",
            ]),
            (CategoricalFacet::CollegeType, &["Co-Ed", "Boys", "Girls"]),
        ];
        Self::from_values(
            table
                .into_iter()
                .map(|(facet, values)| (facet, values.iter().map(|v| v.to_string()).collect()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn facet_keys_round_trip() {
        for facet in CategoricalFacet::ALL {
            assert_eq!(CategoricalFacet::from_key(facet.key()), Some(facet));
        }
        for facet in RangeFacet::ALL {
            assert_eq!(RangeFacet::from_key(facet.key()), Some(facet));
        }
        assert_eq!(CategoricalFacet::from_key("Stream"), None);
    }

    #[test]
    fn facet_order_matches_declaration() {
        let mut sorted = CategoricalFacet::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, CategoricalFacet::ALL.to_vec());
    }

    #[test]
    fn range_tokens_are_scoped_to_their_facet() {
        assert_eq!(
            RangeToken::parse(RangeFacet::Fees, "1l-3l"),
            Some(RangeToken::Fees(FeeBracket::OneToThreeLakh))
        );
        assert_eq!(RangeToken::parse(RangeFacet::Rating, "1l-3l"), None);
        assert_eq!(RangeToken::parse(RangeFacet::Rating, "4.5-plus").map(RangeToken::facet), Some(RangeFacet::Rating));
    }

    #[test]
    fn sort_tokens_match_serde_names() {
        for mode in SortMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.token()));
            assert_eq!(SortMode::from_token(mode.token()), Some(mode));
        }
        assert_eq!(SortMode::from_token("bogus"), None);
    }

    #[test]
    fn vocabulary_lookup_is_case_insensitive() {
        let vocabulary = FacetVocabulary::builtin();
        assert_eq!(vocabulary.canonicalize(CategoricalFacet::City, " pune "), Some("Pune"));
        assert_eq!(vocabulary.canonicalize(CategoricalFacet::State, "Atlantis"), None);
        assert_eq!(vocabulary.canonicalize(CategoricalFacet::City, ""), None);
    }

    #[test]
    fn vocabulary_drops_blanks_and_duplicates() {
        let mut values = BTreeMap::new();
        values.insert(
            CategoricalFacet::City,
            vec!["Pune".to_string(), " pune".to_string(), "  ".to_string(), "Mumbai ".to_string()],
        );
        let vocabulary = FacetVocabulary::from_values(values);
        assert_eq!(vocabulary.values(CategoricalFacet::City), &["Pune".to_string(), "Mumbai".to_string()]);
        assert!(vocabulary.values(CategoricalFacet::Stream).is_empty());
    }
}
