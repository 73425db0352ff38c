macro_rules! str_fixture {
    ($file_name:literal) => {
        include_str!(concat!("../fixtures/", $file_name))
    };
}

pub mod ledger_end {
    pub const OFFSET_42: &str = str_fixture!("ledger-end/42.json");
}

pub mod acs {
    /// One `JsActiveContract` wrapped and one flat entry.
    pub const MIXED_ENVELOPES: &str = str_fixture!("acs/mixed-envelopes.json");
    pub const NEWLINE_DELIMITED: &str = str_fixture!("acs/newline-delimited.jsonl");
    /// Protocol deployment as seen by a validator party.
    pub const PROTOCOL: &str = str_fixture!("acs/protocol.json");
    pub const ERROR: &str = str_fixture!("acs/error.json");
}

pub mod submit {
    pub const COMPLETION: &str = str_fixture!("submit/completion.json");
    pub const INVALID_ARGUMENT: &str = str_fixture!("submit/invalid-argument.json");
}

pub mod balances {
    pub const FULL: &str = str_fixture!("balances/full.json");
}

pub mod coverage {
    pub const SMALL: &str = str_fixture!("coverage/small.json");
}
