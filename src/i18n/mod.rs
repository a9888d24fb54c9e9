//! Operator-facing messages in English and Russian
//!
//! The translation table is declared at the crate root (`locales/`).
//! `EQUILIBRIUM_LANG` picks the language, then the system `LANG`; English
//! otherwise.

use std::sync::atomic::{AtomicU8, Ordering};

#[doc(inline)]
pub use rust_i18n::t;

/// Supported message languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Locale {
    #[default]
    En = 0,
    Ru = 1,
}

impl Locale {
    /// Map a locale tag such as `ru_RU.UTF-8` to a supported language
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        if tag.starts_with("ru") || tag == "russian" {
            Self::Ru
        } else {
            Self::En
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }
}

static CURRENT: AtomicU8 = AtomicU8::new(Locale::En as u8);

pub fn set_locale(locale: Locale) {
    rust_i18n::set_locale(locale.code());
    CURRENT.store(locale as u8, Ordering::Relaxed);
}

pub fn current_locale() -> Locale {
    match CURRENT.load(Ordering::Relaxed) {
        1 => Locale::Ru,
        _ => Locale::En,
    }
}

/// Pick the language from the environment and activate it
pub fn init_from_env() -> Locale {
    let locale = std::env::var("EQUILIBRIUM_LANG")
        .or_else(|_| std::env::var("LANG"))
        .map(|tag| Locale::from_tag(&tag))
        .unwrap_or_default();
    set_locale(locale);
    tracing::debug!(locale = locale.code(), "Message language selected");
    locale
}
