//! Deterministic labels for synthetic cardholders and merchants.

use crate::rng::LedgerRng;

pub struct NameGenerator;

impl NameGenerator {
    pub fn cardholder_name(rng: &mut LedgerRng) -> String {
        let first = rng.pick(FIRST_NAMES);
        let last = rng.pick(LAST_NAMES);
        format!("{first} {last}")
    }

    /// A storefront name that reads like the given category.
    pub fn merchant_name(rng: &mut LedgerRng, category: &str) -> String {
        let owner = rng.pick(LAST_NAMES);
        let noun = match category {
            "bar" => rng.pick(&["Tap Room", "Lounge", "Bar & Grill", "Cocktail Bar"]),
            "coffee shop" => rng.pick(&["Coffee", "Espresso Bar", "Roasters", "Cafe"]),
            "food truck" => rng.pick(&["Tacos", "Street Eats", "Kitchen on Wheels", "BBQ Truck"]),
            "pub" => rng.pick(&["Arms", "Tavern", "Public House", "Alehouse"]),
            "restaurant" => rng.pick(&["Bistro", "Trattoria", "Diner", "Steakhouse"]),
            _ => rng.pick(&["Store", "Outlet", "Market"]),
        };
        format!("{owner}'s {noun}")
    }
}

pub const MERCHANT_CATEGORIES: &[&str] = &["bar", "coffee shop", "food truck", "pub", "restaurant"];

const FIRST_NAMES: &[&str] = &[
    "Robert", "Shane", "Nancy", "Matthew", "Kyle", "Crystal", "Megan", "Danielle",
    "Stephanie", "Kevin", "Brandon", "Malik", "Elizabeth", "Peter", "Sean", "Austin",
    "Michael", "Kristin", "Nicole", "Beth", "Gary", "Hannah", "Laura", "Tiffany",
    "Jonathan", "Anthony", "Ruth", "Gregory", "Priya", "Mateo", "Aisha", "Wei",
];

const LAST_NAMES: &[&str] = &[
    "Johnson", "Grant", "Stewart", "Ware", "Friedman", "Mitchell", "Roberts", "Pierce",
    "Hernandez", "Lopez", "Young", "Alvarez", "Moran", "Bishop", "Harrington", "Singh",
    "Nakamura", "Okafor", "Kowalski", "Brennan", "Duarte", "Lindqvist", "Haddad", "Osei",
];
