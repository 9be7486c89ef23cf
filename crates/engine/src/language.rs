//! Display language and the localized strings of the ledger screens.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Language preference of a session.
///
/// Only phrasing depends on it; totals and advisory payloads are computed the
/// same way for every language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Roman Urdu.
    Ru,
}

impl Language {
    /// Short tag used in storage, settings and advisory requests.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Ru => "RU",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ru => "Roman Urdu",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "EN" => Ok(Language::En),
            "RU" => Ok(Language::Ru),
            other => Err(EngineError::Validation(format!(
                "unsupported language: {other}"
            ))),
        }
    }
}

/// Keys of the translated strings shown around the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    AppName,
    Dashboard,
    Transactions,
    TotalToReceive,
    TotalToPay,
    AddDebtor,
    AddCreditor,
    Name,
    Amount,
    Date,
    Note,
    Save,
    Cancel,
    RecentTransactions,
    NoTransactions,
    AiAssistant,
    AiAdvice,
    AiThinking,
    Login,
    GoogleLogin,
    Logout,
    WelcomeBack,
    NetBalance,
    InstallApp,
    AddToHomeScreen,
}

impl Label {
    /// Returns the text of the label in `language`.
    #[must_use]
    pub const fn text(self, language: Language) -> &'static str {
        let (en, ru) = match self {
            Label::AppName => ("Digital Khata", "Digital Khata"),
            Label::Dashboard => ("Dashboard", "Dashboard"),
            Label::Transactions => ("Transactions", "Len-Den"),
            Label::TotalToReceive => ("Total to Receive", "Kul Lena Hai"),
            Label::TotalToPay => ("Total to Pay", "Kul Dena Hai"),
            Label::AddDebtor => ("Add Debtor", "Paisa Lena Hai"),
            Label::AddCreditor => ("Add Creditor", "Paisa Dena Hai"),
            Label::Name => ("Name", "Naam"),
            Label::Amount => ("Amount", "Raqam"),
            Label::Date => ("Date", "Tareekh"),
            Label::Note => ("Note/Description", "Wazahat/Note"),
            Label::Save => ("Save", "Mehfooz Karein"),
            Label::Cancel => ("Cancel", "Khatam Karein"),
            Label::RecentTransactions => ("Recent Transactions", "Halia Len-Den"),
            Label::NoTransactions => (
                "No transactions yet. Start by adding your first entry!",
                "Abhi koi len-den nahi hai. Pehla entry add karein!",
            ),
            Label::AiAssistant => ("Smart Advisor", "Smart Mashwara"),
            Label::AiAdvice => ("Khata Intelligence", "Khata Ki Maloomat"),
            Label::AiThinking => ("Analyzing...", "Soch raha hoon..."),
            Label::Login => ("Login", "Login Karein"),
            Label::GoogleLogin => ("Sign in with Google", "Google se Login karein"),
            Label::Logout => ("Logout", "Logout Karein"),
            Label::WelcomeBack => ("Welcome back", "Khush-amdeed"),
            Label::NetBalance => ("Net Balance", "Baqaya Balance"),
            Label::InstallApp => ("Install App", "App Install Karein"),
            Label::AddToHomeScreen => ("Add to Home Screen", "App home screen pr add karein"),
        };
        match language {
            Language::En => en,
            Language::Ru => ru,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tags_case_insensitively() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!(" RU ".parse::<Language>().unwrap(), Language::Ru);
        assert_eq!(
            "fr".parse::<Language>(),
            Err(EngineError::Validation("unsupported language: FR".to_string()))
        );
    }

    #[test]
    fn serializes_as_upper_tag() {
        assert_eq!(serde_json::to_string(&Language::Ru).unwrap(), "\"RU\"");
        let parsed: Language = serde_json::from_str("\"EN\"").unwrap();
        assert_eq!(parsed, Language::En);
    }

    #[test]
    fn labels_switch_with_language() {
        assert_eq!(Label::TotalToPay.text(Language::En), "Total to Pay");
        assert_eq!(Label::TotalToPay.text(Language::Ru), "Kul Dena Hai");
        assert_eq!(Label::AppName.text(Language::Ru), "Digital Khata");
    }
}
