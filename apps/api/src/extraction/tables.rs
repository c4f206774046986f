//! Static lookup tables for the field extractors.
//!
//! Every table is an ordered slice: match precedence is first-match-wins in
//! declaration order, so none of these may become a hash map.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Role category assigned by the role extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleType {
    #[serde(rename = "SWE")]
    Swe,
    DevOps,
    Data,
    #[serde(rename = "PM")]
    Pm,
    #[serde(rename = "QA")]
    Qa,
    Security,
}

impl RoleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Swe => "SWE",
            Self::DevOps => "DevOps",
            Self::Data => "Data",
            Self::Pm => "PM",
            Self::Qa => "QA",
            Self::Security => "Security",
        }
    }
}

/// Interview outcome assigned by the outcome extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewOutcome {
    Offer,
    Reject,
    Pending,
}

impl InterviewOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Reject => "reject",
            Self::Pending => "pending",
        }
    }
}

/// Lower-cased alias → canonical company name.
pub const COMPANY_ALIASES: &[(&str, &str)] = &[
    // Big tech
    ("amazon", "Amazon"),
    ("amzn", "Amazon"),
    ("aws", "Amazon"),
    ("google", "Google"),
    ("alphabet", "Google"),
    ("meta", "Meta"),
    ("facebook", "Meta"),
    ("fb", "Meta"),
    ("microsoft", "Microsoft"),
    ("msft", "Microsoft"),
    ("apple", "Apple"),
    ("aapl", "Apple"),
    ("netflix", "Netflix"),
    ("tesla", "Tesla"),
    ("nvidia", "Nvidia"),
    ("intel", "Intel"),
    ("amd", "AMD"),
    ("ibm", "IBM"),
    ("oracle", "Oracle"),
    ("salesforce", "Salesforce"),
    // Startups / unicorns
    ("uber", "Uber"),
    ("lyft", "Lyft"),
    ("airbnb", "Airbnb"),
    ("stripe", "Stripe"),
    ("snowflake", "Snowflake"),
    ("databricks", "Databricks"),
    ("palantir", "Palantir"),
    ("coinbase", "Coinbase"),
    ("doordash", "DoorDash"),
    ("instacart", "Instacart"),
    ("reddit", "Reddit"),
    ("discord", "Discord"),
    ("roblox", "Roblox"),
    ("pinterest", "Pinterest"),
    ("snap", "Snap"),
    ("snapchat", "Snap"),
    ("twitter", "Twitter"),
    ("x corp", "Twitter"),
    ("linkedin", "LinkedIn"),
    ("tiktok", "TikTok"),
    ("bytedance", "ByteDance"),
    // Banks
    ("jpmorgan", "JPMorgan Chase"),
    ("jp morgan", "JPMorgan Chase"),
    ("jpm", "JPMorgan Chase"),
    ("chase", "JPMorgan Chase"),
    ("goldman sachs", "Goldman Sachs"),
    ("goldman", "Goldman Sachs"),
    ("gs", "Goldman Sachs"),
    ("morgan stanley", "Morgan Stanley"),
    ("bank of america", "Bank of America"),
    ("bofa", "Bank of America"),
    ("boa", "Bank of America"),
    ("citigroup", "Citigroup"),
    ("citi", "Citigroup"),
    ("wells fargo", "Wells Fargo"),
    ("barclays", "Barclays"),
    ("credit suisse", "Credit Suisse"),
    ("ubs", "UBS"),
    ("deutsche bank", "Deutsche Bank"),
    ("hsbc", "HSBC"),
    // Fintech / financial services
    ("visa", "Visa"),
    ("mastercard", "Mastercard"),
    ("paypal", "PayPal"),
    ("square", "Block"),
    ("block", "Block"),
    ("robinhood", "Robinhood"),
    ("capital one", "Capital One"),
    ("discover", "Discover"),
    ("american express", "American Express"),
    ("amex", "American Express"),
    ("fidelity", "Fidelity"),
    ("charles schwab", "Charles Schwab"),
    ("schwab", "Charles Schwab"),
    ("vanguard", "Vanguard"),
    ("blackrock", "BlackRock"),
    // Trading firms
    ("two sigma", "Two Sigma"),
    ("jane street", "Jane Street"),
    ("citadel", "Citadel"),
    ("de shaw", "D. E. Shaw"),
    ("d.e. shaw", "D. E. Shaw"),
    ("hudson river trading", "Hudson River Trading"),
    ("hrt", "Hudson River Trading"),
    ("jump trading", "Jump Trading"),
    ("optiver", "Optiver"),
    ("akuna capital", "Akuna Capital"),
    ("virtu", "Virtu Financial"),
];

const ROLE_PATTERN_SOURCES: &[(RoleType, &[&str])] = &[
    (
        RoleType::Swe,
        &[
            r"\bsoftware engineer\b",
            r"\bswe\b",
            r"\bengineering\b",
            r"\bbackend\b",
            r"\bfrontend\b",
            r"\bfull[- ]?stack\b",
            r"\bfullstack\b",
            r"\bweb developer\b",
            r"\bdeveloper\b",
        ],
    ),
    (
        RoleType::DevOps,
        &[
            r"\bdevops\b",
            r"\bsre\b",
            r"\bsite reliability\b",
            r"\binfrastructure\b",
            r"\bplatform engineer\b",
        ],
    ),
    (
        RoleType::Data,
        &[
            r"\bdata scientist\b",
            r"\bdata engineer\b",
            r"\bml engineer\b",
            r"\bmachine learning\b",
            r"\bai engineer\b",
            r"\bdata analyst\b",
        ],
    ),
    (RoleType::Pm, &[r"\bproduct manager\b", r"\bpm\b", r"\bproduct\b"]),
    (
        RoleType::Qa,
        &[
            r"\bqa\b",
            r"\bquality assurance\b",
            r"\btester\b",
            r"\btest engineer\b",
        ],
    ),
    (
        RoleType::Security,
        &[
            r"\bsecurity engineer\b",
            r"\bappsec\b",
            r"\binfosec\b",
            r"\bcybersecurity\b",
        ],
    ),
];

/// Compiled role patterns, categories in declaration order.
pub static ROLE_PATTERNS: Lazy<Vec<(RoleType, Vec<Regex>)>> = Lazy::new(|| {
    ROLE_PATTERN_SOURCES
        .iter()
        .map(|(role, sources)| {
            let compiled = sources
                .iter()
                .map(|p| Regex::new(p).expect("role pattern is valid"))
                .collect();
            (*role, compiled)
        })
        .collect()
});

type LevelCanonicalizer = fn(&Captures) -> String;

fn upper_capture(caps: &Captures) -> String {
    caps.get(1)
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_default()
}

fn senior(_: &Captures) -> String {
    "Senior".to_string()
}

fn junior(_: &Captures) -> String {
    "Junior".to_string()
}

fn mid_level(_: &Captures) -> String {
    "Mid-level".to_string()
}

fn entry(_: &Captures) -> String {
    "Entry".to_string()
}

fn lead(_: &Captures) -> String {
    "Lead".to_string()
}

fn principal(_: &Captures) -> String {
    "Principal".to_string()
}

fn staff(_: &Captures) -> String {
    "Staff".to_string()
}

const LEVEL_PATTERN_SOURCES: &[(&str, LevelCanonicalizer)] = &[
    (r"\b(L[2-9]|E[2-9]|IC[2-9])\b", upper_capture),
    (r"\b([Ss]enior|Sr\.?)\b", senior),
    (r"\b([Jj]unior|Jr\.?)\b", junior),
    (r"\b([Mm]id[-\s]?level)\b", mid_level),
    (r"\b([Ee]ntry[-\s]?level)\b", entry),
    (r"\b([Ll]ead)\b", lead),
    (r"\b([Pp]rincipal)\b", principal),
    (r"\b([Ss]taff)\b", staff),
];

/// Compiled level patterns in priority order. Matched against original-case text.
pub static LEVEL_PATTERNS: Lazy<Vec<(Regex, LevelCanonicalizer)>> = Lazy::new(|| {
    LEVEL_PATTERN_SOURCES
        .iter()
        .map(|(p, canon)| (Regex::new(p).expect("level pattern is valid"), *canon))
        .collect()
});

/// Lower-cased location keyword → canonical location.
pub const LOCATION_KEYWORDS: &[(&str, &str)] = &[
    ("remote", "Remote"),
    ("wfh", "Remote"),
    ("work from home", "Remote"),
    ("seattle", "Seattle"),
    ("san francisco", "San Francisco"),
    ("sf", "San Francisco"),
    ("bay area", "San Francisco"),
    ("nyc", "New York"),
    ("new york", "New York"),
    ("austin", "Austin"),
    ("boston", "Boston"),
    ("chicago", "Chicago"),
    ("los angeles", "Los Angeles"),
    ("la", "Los Angeles"),
];

pub const OUTCOME_KEYWORDS: &[(InterviewOutcome, &[&str])] = &[
    (
        InterviewOutcome::Offer,
        &["offer", "accepted", "got the job", "hired", "joining"],
    ),
    (
        InterviewOutcome::Reject,
        &[
            "rejected",
            "didn't get",
            "failed",
            "rejection",
            "turned down",
            "no offer",
        ],
    ),
    (
        InterviewOutcome::Pending,
        &[
            "waiting",
            "in process",
            "pending",
            "under review",
            "interviewing",
        ],
    ),
];
