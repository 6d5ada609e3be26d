use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Category, CategoryFlags, ClassifiedRecord, RawRecord};
use crate::normalize::normalize_text;

fn pattern(source: &str) -> Regex {
    match Regex::new(source) {
        Ok(regex) => regex,
        Err(err) => panic!("invalid classification pattern {source:?}: {err}"),
    }
}

static SUCCESS: Lazy<Regex> = Lazy::new(|| {
    pattern(r"umowienie magazyn|umowienie|umow|sukces|magazyn|\b(booking|booked|success|warehouse)\b")
});
static OPEN_STATE: Lazy<Regex> = Lazy::new(|| pattern(r"\b(otwarty|otwarte|open)\b"));
static CLOSED_STATE: Lazy<Regex> = Lazy::new(|| pattern(r"\b(zamkniety|zamkniete|closed)\b"));
static POSTPONED_STATE: Lazy<Regex> =
    Lazy::new(|| pattern(r"\b(przelozony|przelozone|odroczony|postponed|deferred)\b"));
static CALLBACK: Lazy<Regex> = Lazy::new(|| pattern(r"\b(ponowny kontakt|callback requested)\b"));
static SYSTEM_CALLBACK: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(ponowny kontakt|callback).*\bsystem|\bsystem\w*\b.*(ponowny kontakt|callback)")
});
static UNREACHABLE: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"nie udalo sie polaczyc|brak odpowiedzi|nie odbiera|nieosiagaln|poza zasiegiem|poczta glosowa|skrzynka glosowa|sekretarka|przekroczono czas|timeout|time out|no answer|unreachable|voicemail|voice mail",
    )
});
static WRONG_NUMBER: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(bledny|nieprawidlowy|niepoprawny|nieistniejacy) numer|numer nie istnieje|wrong number|invalid number")
});
static NO_PHONE: Lazy<Regex> =
    Lazy::new(|| pattern(r"brak dostepnych telefonow|no available phone numbers"));

/// Normalized text of the fields the rules look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFields {
    pub call_code: String,
    pub call_reason: String,
    pub close_reason: String,
    pub state: String,
    pub end_reason: String,
    pub disconnect_reason: String,
    pub disconnect_cause: String,
}

impl NormalizedFields {
    pub fn from_record(record: &RawRecord) -> Self {
        Self {
            call_code: normalize_text(record.last_call_code.as_deref()),
            call_reason: normalize_text(record.last_call_reason.as_deref()),
            close_reason: normalize_text(record.close_reason.as_deref()),
            state: normalize_text(record.record_state.as_deref()),
            end_reason: normalize_text(record.end_reason.as_deref()),
            disconnect_reason: normalize_text(record.disconnect_reason.as_deref()),
            disconnect_cause: normalize_text(record.disconnect_cause.as_deref()),
        }
    }
}

/// A category, the test that raises it, and the categories that veto it.
pub struct Rule {
    pub category: Category,
    pub predicate: fn(&NormalizedFields) -> bool,
    pub excluded_by: &'static [Category],
}

fn is_booked(f: &NormalizedFields) -> bool {
    SUCCESS.is_match(&f.call_code)
}

fn is_open(f: &NormalizedFields) -> bool {
    OPEN_STATE.is_match(&f.state)
}

fn is_callback_agent(f: &NormalizedFields) -> bool {
    CALLBACK.is_match(&f.call_reason) || CALLBACK.is_match(&f.call_code)
}

fn is_callback_system(f: &NormalizedFields) -> bool {
    let postponed_without_outcome = POSTPONED_STATE.is_match(&f.state) && f.call_code.is_empty();
    postponed_without_outcome
        || SYSTEM_CALLBACK.is_match(&f.call_reason)
        || SYSTEM_CALLBACK.is_match(&f.call_code)
        || SYSTEM_CALLBACK.is_match(&f.state)
}

fn is_postponed(f: &NormalizedFields) -> bool {
    POSTPONED_STATE.is_match(&f.state)
}

fn is_closed_by_system(f: &NormalizedFields) -> bool {
    if UNREACHABLE.is_match(&f.end_reason) || UNREACHABLE.is_match(&f.disconnect_reason) {
        return true;
    }
    if !CLOSED_STATE.is_match(&f.state) {
        return false;
    }
    // closed with nothing an agent could have written down
    WRONG_NUMBER.is_match(&f.disconnect_cause) || f.call_reason.is_empty()
}

fn is_closed_by_agent(f: &NormalizedFields) -> bool {
    CLOSED_STATE.is_match(&f.state) && !f.call_code.is_empty()
}

fn is_unusable(f: &NormalizedFields) -> bool {
    NO_PHONE.is_match(&f.close_reason)
}

pub static RULES: [Rule; Category::COUNT] = [
    Rule {
        category: Category::Booked,
        predicate: is_booked,
        excluded_by: &[],
    },
    Rule {
        category: Category::Open,
        predicate: is_open,
        excluded_by: &[],
    },
    Rule {
        category: Category::CallbackAgent,
        predicate: is_callback_agent,
        excluded_by: &[Category::CallbackSystem],
    },
    Rule {
        category: Category::CallbackSystem,
        predicate: is_callback_system,
        excluded_by: &[],
    },
    Rule {
        category: Category::ClosedByAgent,
        predicate: is_closed_by_agent,
        excluded_by: &[Category::ClosedBySystem],
    },
    Rule {
        category: Category::ClosedBySystem,
        predicate: is_closed_by_system,
        excluded_by: &[],
    },
    Rule {
        category: Category::Unusable,
        predicate: is_unusable,
        excluded_by: &[],
    },
    Rule {
        category: Category::Postponed,
        predicate: is_postponed,
        excluded_by: &[],
    },
];

/// Evaluates every predicate first, then applies exclusions against the raw
/// matches, so rule order never changes the outcome.
pub fn classify_fields(fields: &NormalizedFields) -> CategoryFlags {
    let mut matched = CategoryFlags::default();
    for rule in RULES.iter() {
        matched.set(rule.category, (rule.predicate)(fields));
    }

    let mut flags = matched;
    for rule in RULES.iter() {
        if rule.excluded_by.iter().any(|other| matched.get(*other)) {
            flags.set(rule.category, false);
        }
    }
    flags
}

pub fn classify_record(record: RawRecord) -> ClassifiedRecord {
    let flags = classify_fields(&NormalizedFields::from_record(&record));
    ClassifiedRecord { record, flags }
}

pub fn classify_all(records: Vec<RawRecord>) -> Vec<ClassifiedRecord> {
    records.into_iter().map(classify_record).collect()
}
