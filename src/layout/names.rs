//! Name corpora for streets

use rand::Rng;
use rand_chacha::ChaCha8Rng;

const SURNAMES: &[&str] = &[
    "Adams", "Baker", "Bishop", "Brooks", "Caldwell", "Carver", "Chandler", "Cooper",
    "Crawford", "Dawson", "Ellis", "Fairbanks", "Fletcher", "Garrison", "Hale", "Harper",
    "Hawthorne", "Hollis", "Jennings", "Kendall", "Lawson", "Lincoln", "Mercer", "Morrow",
    "Nash", "Oakley", "Palmer", "Porter", "Prescott", "Quincy", "Reed", "Sawyer",
    "Sheldon", "Spencer", "Thatcher", "Tucker", "Vance", "Walker", "Whitaker", "Wright",
];

const PLACE_NAMES: &[&str] = &[
    "Ashford", "Bayview", "Birchwood", "Briar", "Cedar", "Clearwater", "Cottonwood",
    "Eastbrook", "Elm", "Fairview", "Glenwood", "Greenfield", "Harbor", "Highland",
    "Lakeside", "Maple", "Meadow", "Mill", "Oak", "Orchard", "Pine", "Prairie",
    "Ridge", "Riverside", "Rosewood", "Spring", "Stonebridge", "Summit", "Sycamore",
    "Valley", "Walnut", "Willow",
];

pub fn any_surname(rng: &mut ChaCha8Rng) -> &'static str {
    SURNAMES[rng.gen_range(0..SURNAMES.len())]
}

pub fn a_place_name(rng: &mut ChaCha8Rng) -> &'static str {
    PLACE_NAMES[rng.gen_range(0..PLACE_NAMES.len())]
}

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 12th, 21st...
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
