use crate::model::Category;

// Ordered: the first category with any matching keyword wins, so earlier
// entries take precedence when a text matches several lists.
const KEYWORD_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Work,
        &[
            "meeting",
            "call",
            "email",
            "project",
            "deadline",
            "presentation",
            "report",
            "conference",
        ],
    ),
    (
        Category::Personal,
        &[
            "grocery",
            "shopping",
            "buy",
            "pick up",
            "doctor",
            "dentist",
            "appointment",
        ],
    ),
    (
        Category::Health,
        &[
            "exercise",
            "gym",
            "workout",
            "run",
            "yoga",
            "meditation",
            "diet",
        ],
    ),
    (
        Category::Home,
        &["clean", "laundry", "cook", "repair", "maintenance", "organize"],
    ),
    (
        Category::Social,
        &[
            "party",
            "dinner",
            "lunch",
            "coffee",
            "birthday",
            "event",
            "celebration",
        ],
    ),
    (
        Category::Finance,
        &["bill", "payment", "invoice", "budget", "tax", "bank"],
    ),
    (
        Category::Learning,
        &["study", "read", "course", "learn", "practice", "homework"],
    ),
];

/// Maps free task text to a category by case-insensitive substring match
/// against the fixed keyword table; `General` when nothing matches.
pub fn categorize(text: &str) -> Category {
    let lower = text.to_lowercase();
    for (category, keywords) in KEYWORD_TABLE {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return *category;
        }
    }
    Category::General
}
