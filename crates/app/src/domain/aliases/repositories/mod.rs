//! Alias Repositories

mod company_aliases;
mod suggestions;

pub(crate) use company_aliases::PgCompanyAliasesRepository;
pub(crate) use suggestions::{PgAliasSuggestionsRepository, SuggestionDecision};
