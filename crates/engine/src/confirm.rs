//! Confirmation policy for destructive actions.
//!
//! The host decides how to ask (dialog, keypress, always-yes in scripts);
//! the engine only asks through [`Confirm`].

use crate::Language;

/// Destructive actions that need the user's agreement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prompt {
    DeleteEntry,
    Logout,
}

impl Prompt {
    #[must_use]
    pub const fn text(self, language: Language) -> &'static str {
        match (self, language) {
            (Prompt::DeleteEntry, Language::En) => "Are you sure you want to delete this entry?",
            (Prompt::DeleteEntry, Language::Ru) => "Kya aap is entry ko delete karna chahte hain?",
            (Prompt::Logout, Language::En) => "Are you sure you want to logout?",
            (Prompt::Logout, Language::Ru) => "Logout karna chahte hain?",
        }
    }
}

pub trait Confirm {
    fn confirm(&self, prompt: Prompt, language: Language) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(Prompt, Language) -> bool,
{
    fn confirm(&self, prompt: Prompt, language: Language) -> bool {
        self(prompt, language)
    }
}

/// Agrees to everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: Prompt, _language: Language) -> bool {
        true
    }
}
