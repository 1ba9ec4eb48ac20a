pub mod key_value_store;

pub use key_value_store::{
    FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, HISTORY_KEY, USER_KEY,
};
