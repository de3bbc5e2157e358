pub mod activity;
pub mod amount;
pub mod domain;
pub mod key_store;
pub mod ports;
pub mod preference;
pub mod state_machine;

pub use activity::{
    resolve_display_props, resolve_identity, ActivityError, ActivityIdentity, ActivityLedger,
    ActivityRecord, DetailLookup, LocalId, ObserveOutcome, RawActivity, TrackedActivity, TxHash,
};
pub use amount::{from_atomic, to_atomic, DecimalAmount, DecimalInput};
pub use domain::{signing_message, AccountAddress, NetworkEnvironment, ShielderPrivateKey};
pub use key_store::{KeyStore, KeyStoreError, DEFAULT_KEY_NAMESPACE};
pub use ports::{KeyDerivationPort, PortError, StoragePort};
pub use preference::{NetworkPreference, PreferenceError, DEFAULT_NETWORK_PREFERENCE_KEY};
pub use state_machine::{activity_transition, ActivityAction, ActivityStage, StageTransition};
