//! Structures used for serializing requests to the JSON Ledger API.

pub mod active_contracts {
    use crate::identifier::Offset;
    use serde::Serialize;
    use std::collections::BTreeMap;

    /// Body of `POST /v2/state/active-contracts`.
    #[derive(Clone, Debug, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct ActiveContractsRequest {
        pub filter: TransactionFilter,
        pub active_at_offset: Offset,
    }

    impl ActiveContractsRequest {
        /// All contracts visible to `party` as of `offset`.
        pub fn for_party(party: &str, filter: IdentifierFilter, offset: Offset) -> Self {
            let mut filters_by_party = BTreeMap::new();
            filters_by_party.insert(
                party.to_owned(),
                PartyFilter {
                    identifier_filter: filter,
                },
            );

            Self {
                filter: TransactionFilter { filters_by_party },
                active_at_offset: offset,
            }
        }
    }

    #[derive(Clone, Debug, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionFilter {
        pub filters_by_party: BTreeMap<String, PartyFilter>,
    }

    #[derive(Clone, Debug, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct PartyFilter {
        pub identifier_filter: IdentifierFilter,
    }

    /// Selects which templates of a party's contracts are returned.
    ///
    /// Some ledgers do not filter by template reliably, so callers filter on
    /// the client side after a [NoFilter](IdentifierFilter::NoFilter) query.
    #[derive(Copy, Clone, Debug, Serialize, PartialEq, Eq)]
    #[serde(rename_all = "camelCase")]
    pub enum IdentifierFilter {
        WildcardFilter {},
        NoFilter {},
    }

    impl Default for IdentifierFilter {
        fn default() -> Self {
            Self::WildcardFilter {}
        }
    }
}

pub mod submit {
    use crate::identifier::TemplateId;
    use rand::Rng;
    use serde::Serialize;
    use std::fmt;
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Unique id of a submitted command.
    ///
    /// The ledger deduplicates commands by id, so every submission needs a
    /// fresh one.
    #[derive(Clone, Debug, Serialize, PartialEq, Eq, Hash)]
    #[serde(transparent)]
    pub struct CommandId(pub String);

    impl CommandId {
        const SUFFIX_LEN: usize = 6;

        /// `<prefix>-<unix seconds>-<random lowercase suffix>`
        pub fn generate(prefix: &str) -> Self {
            let seconds = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            let mut rng = rand::thread_rng();
            let suffix = (0..Self::SUFFIX_LEN)
                .map(|_| rng.gen_range(b'a'..=b'z') as char)
                .collect::<String>();

            Self(format!("{prefix}-{seconds}-{suffix}"))
        }
    }

    impl fmt::Display for CommandId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    /// Body of `POST /v2/commands/submit-and-wait`.
    #[derive(Clone, Debug, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct SubmitAndWait {
        pub user_id: String,
        pub act_as: Vec<String>,
        pub read_as: Vec<String>,
        pub command_id: CommandId,
        pub commands: Vec<Command>,
    }

    #[derive(Clone, Debug, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub enum Command {
        CreateCommand(CreateCommand),
    }

    #[derive(Clone, Debug, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateCommand {
        pub template_id: TemplateId,
        pub create_argument: serde_json::Value,
    }

    impl Command {
        pub fn create(template_id: TemplateId, create_argument: serde_json::Value) -> Self {
            Self::CreateCommand(CreateCommand {
                template_id,
                create_argument,
            })
        }
    }
}
