use std::fmt;
use std::str::FromStr;

use crate::CatalogError;
use crate::countries::COUNTRY_DATA;

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("Albania", "AL"),
    ("Algeria", "DZ"),
    ("Andorra", "AD"),
    ("Argentina", "AR"),
    ("Armenia", "AM"),
    ("Australia", "AU"),
    ("Austria", "AT"),
    ("Azerbaijan", "AZ"),
    ("Bahrain", "BH"),
    ("Belarus", "BY"),
    ("Belgium", "BE"),
    ("Bolivia", "BO"),
    ("Bosnia and Herzegovina", "BA"),
    ("Brazil", "BR"),
    ("Bulgaria", "BG"),
    ("Canada", "CA"),
    ("Chile", "CL"),
    ("China", "CN"),
    ("Colombia", "CO"),
    ("Croatia", "HR"),
    ("Cyprus", "CY"),
    ("Czech Republic", "CZ"),
    ("Denmark", "DK"),
    ("Ecuador", "EC"),
    ("Egypt", "EG"),
    ("Estonia", "EE"),
    ("Finland", "FI"),
    ("France", "FR"),
    ("Georgia", "GE"),
    ("Germany", "DE"),
    ("Ghana", "GH"),
    ("Greece", "GR"),
    ("Hungary", "HU"),
    ("Iceland", "IS"),
    ("India", "IN"),
    ("Indonesia", "ID"),
    ("Iran", "IR"),
    ("Iraq", "IQ"),
    ("Ireland", "IE"),
    ("Israel", "IL"),
    ("Italy", "IT"),
    ("Japan", "JP"),
    ("Jordan", "JO"),
    ("Kazakhstan", "KZ"),
    ("Kenya", "KE"),
    ("Kuwait", "KW"),
    ("Kyrgyzstan", "KG"),
    ("Latvia", "LV"),
    ("Lebanon", "LB"),
    ("Liechtenstein", "LI"),
    ("Lithuania", "LT"),
    ("Luxembourg", "LU"),
    ("Malaysia", "MY"),
    ("Malta", "MT"),
    ("Mexico", "MX"),
    ("Moldova", "MD"),
    ("Monaco", "MC"),
    ("Montenegro", "ME"),
    ("Morocco", "MA"),
    ("Netherlands", "NL"),
    ("New Zealand", "NZ"),
    ("Nigeria", "NG"),
    ("North Korea", "KP"),
    ("North Macedonia", "MK"),
    ("Norway", "NO"),
    ("Pakistan", "PK"),
    ("Peru", "PE"),
    ("Philippines", "PH"),
    ("Poland", "PL"),
    ("Portugal", "PT"),
    ("Qatar", "QA"),
    ("Romania", "RO"),
    ("Russia", "RU"),
    ("San Marino", "SM"),
    ("Saudi Arabia", "SA"),
    ("Serbia", "RS"),
    ("Singapore", "SG"),
    ("Slovakia", "SK"),
    ("Slovenia", "SI"),
    ("South Africa", "ZA"),
    ("South Korea", "KR"),
    ("Spain", "ES"),
    ("Sweden", "SE"),
    ("Switzerland", "CH"),
    ("Syria", "SY"),
    ("Taiwan", "TW"),
    ("Thailand", "TH"),
    ("Turkey", "TR"),
    ("Ukraine", "UA"),
    ("United Arab Emirates", "UAE"),
    ("United Kingdom", "UK"),
    ("United States", "USA"),
    ("Uruguay", "UY"),
    ("Uzbekistan", "UZ"),
    ("Vatican City", "VA"),
    ("Venezuela", "VE"),
    ("Vietnam", "VN"),
];

const STOPWORDS: &[&str] = &[
    "and",
    "of",
    "the",
    "republic",
    "federation",
    "democratic",
    "people",
    "arab",
    "emirates",
    "kingdom",
    "state",
    "states",
    "north",
    "south",
];

/// Short label text for a country: the known code when there is one,
/// otherwise initials built from the significant words of the name.
pub fn abbreviate(name: &str) -> String {
    if let Ok(i) = ABBREVIATIONS.binary_search_by(|(n, _)| (*n).cmp(name)) {
        return ABBREVIATIONS[i].1.to_string();
    }

    let words: Vec<String> = name
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect();

    match words.as_slice() {
        [first, second, ..] => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .collect::<String>()
            .to_uppercase(),
        [only] => only.chars().take(2).collect::<String>().to_uppercase(),
        [] => name.chars().take(2).collect::<String>().to_uppercase(),
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Region {
    Europe,
    Asia,
    Americas,
    Africa,
    Oceania,
    /// Everything in the embedded table.
    World,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Europe,
        Region::Asia,
        Region::Americas,
        Region::Africa,
        Region::Oceania,
        Region::World,
    ];

    /// Member names. Regions may list countries the embedded table lacks.
    pub fn members(self) -> Vec<&'static str> {
        match self {
            Region::Europe => EUROPE.to_vec(),
            Region::Asia => ASIA.to_vec(),
            Region::Americas => AMERICAS.to_vec(),
            Region::Africa => AFRICA.to_vec(),
            Region::Oceania => OCEANIA.to_vec(),
            Region::World => COUNTRY_DATA.iter().map(|(n, _)| *n).collect(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Region::Europe => "Europe",
            Region::Asia => "Asia",
            Region::Americas => "Americas",
            Region::Africa => "Africa",
            Region::Oceania => "Oceania",
            Region::World => "World",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Region::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CatalogError::UnknownRegion(wanted.to_string()))
    }
}

const EUROPE: &[&str] = &[
    "Albania",
    "Andorra",
    "Austria",
    "Belarus",
    "Belgium",
    "Bosnia and Herzegovina",
    "Bulgaria",
    "Croatia",
    "Cyprus",
    "Czech Republic",
    "Denmark",
    "Estonia",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Hungary",
    "Iceland",
    "Ireland",
    "Italy",
    "Latvia",
    "Liechtenstein",
    "Lithuania",
    "Luxembourg",
    "Malta",
    "Moldova",
    "Monaco",
    "Montenegro",
    "Netherlands",
    "North Macedonia",
    "Norway",
    "Poland",
    "Portugal",
    "Romania",
    "Russia",
    "San Marino",
    "Serbia",
    "Slovakia",
    "Slovenia",
    "Spain",
    "Sweden",
    "Switzerland",
    "Ukraine",
    "United Kingdom",
    "Vatican City",
];

const ASIA: &[&str] = &[
    "Afghanistan",
    "Armenia",
    "Azerbaijan",
    "Bahrain",
    "Bangladesh",
    "Bhutan",
    "Brunei",
    "Cambodia",
    "China",
    "Cyprus",
    "Georgia",
    "India",
    "Indonesia",
    "Iran",
    "Iraq",
    "Israel",
    "Japan",
    "Jordan",
    "Kazakhstan",
    "Kuwait",
    "Kyrgyzstan",
    "Laos",
    "Lebanon",
    "Malaysia",
    "Maldives",
    "Mongolia",
    "Myanmar",
    "Nepal",
    "North Korea",
    "Oman",
    "Pakistan",
    "Philippines",
    "Qatar",
    "Saudi Arabia",
    "Singapore",
    "South Korea",
    "Sri Lanka",
    "Syria",
    "Taiwan",
    "Tajikistan",
    "Thailand",
    "Timor-Leste",
    "Turkey",
    "Turkmenistan",
    "United Arab Emirates",
    "Uzbekistan",
    "Vietnam",
    "Yemen",
];

const AMERICAS: &[&str] = &[
    "Argentina",
    "Belize",
    "Bolivia",
    "Brazil",
    "Canada",
    "Chile",
    "Colombia",
    "Costa Rica",
    "Cuba",
    "Dominican Republic",
    "Ecuador",
    "El Salvador",
    "Guatemala",
    "Haiti",
    "Honduras",
    "Jamaica",
    "Mexico",
    "Nicaragua",
    "Panama",
    "Paraguay",
    "Peru",
    "Trinidad and Tobago",
    "United States",
    "Uruguay",
    "Venezuela",
];

const AFRICA: &[&str] = &[
    "Algeria",
    "Angola",
    "Benin",
    "Botswana",
    "Burkina Faso",
    "Burundi",
    "Cameroon",
    "Cape Verde",
    "Central African Republic",
    "Chad",
    "Comoros",
    "Congo",
    "DR Congo",
    "Djibouti",
    "Egypt",
    "Equatorial Guinea",
    "Eritrea",
    "Eswatini",
    "Ethiopia",
    "Gabon",
    "Gambia",
    "Ghana",
    "Guinea",
    "Guinea-Bissau",
    "Ivory Coast",
    "Kenya",
    "Lesotho",
    "Liberia",
    "Libya",
    "Madagascar",
    "Malawi",
    "Mali",
    "Mauritania",
    "Mauritius",
    "Morocco",
    "Mozambique",
    "Namibia",
    "Niger",
    "Nigeria",
    "Rwanda",
    "Sao Tome and Principe",
    "Senegal",
    "Seychelles",
    "Sierra Leone",
    "Somalia",
    "South Africa",
    "South Sudan",
    "Sudan",
    "Tanzania",
    "Togo",
    "Tunisia",
    "Uganda",
    "Zambia",
    "Zimbabwe",
];

const OCEANIA: &[&str] = &[
    "Australia",
    "Fiji",
    "Kiribati",
    "Marshall Islands",
    "Micronesia",
    "Nauru",
    "New Zealand",
    "Palau",
    "Papua New Guinea",
    "Samoa",
    "Solomon Islands",
    "Tonga",
    "Tuvalu",
    "Vanuatu",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_win() {
        assert_eq!(abbreviate("Germany"), "DE");
        assert_eq!(abbreviate("United States"), "USA");
        assert_eq!(abbreviate("United Kingdom"), "UK");
        assert_eq!(abbreviate("United Arab Emirates"), "UAE");
    }

    #[test]
    fn fallback_uses_significant_words() {
        // "Central", "African" survive; "Republic" is a stopword.
        assert_eq!(abbreviate("Central African Republic"), "CA");
        assert_eq!(abbreviate("Democratic Republic of the Congo"), "CO");
        assert_eq!(abbreviate("South Sudan"), "SU");
        assert_eq!(abbreviate("Timor-Leste"), "TL");
        assert_eq!(abbreviate("Trinidad and Tobago"), "TT");
    }

    #[test]
    fn fallback_when_every_word_is_dropped() {
        assert_eq!(abbreviate("The Republic"), "TH");
        assert_eq!(abbreviate("\u{c5}land"), "LA");
    }

    #[test]
    fn abbreviation_table_is_sorted() {
        assert!(ABBREVIATIONS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn regions_parse_case_insensitively() {
        assert_eq!("europe".parse::<Region>(), Ok(Region::Europe));
        assert_eq!(" WORLD ".parse::<Region>(), Ok(Region::World));
        assert_eq!(
            "Atlantis".parse::<Region>(),
            Err(CatalogError::UnknownRegion("Atlantis".to_string()))
        );
    }

    #[test]
    fn world_is_the_embedded_table() {
        assert_eq!(Region::World.members().len(), COUNTRY_DATA.len());
        assert!(Region::Europe.members().contains(&"Latvia"));
        assert!(Region::Oceania.members().contains(&"New Zealand"));
    }
}
