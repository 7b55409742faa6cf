//! The state store for one running game
//!
//! A [`Store`] owns the [`GameState`], the random source used for shuffling
//! and the [`Storage`] the persisted subset is mirrored to. Saved data is
//! read once when the store opens and written back after every intent that
//! changes the persisted subset.

use derive_where::derive_where;
use fastrand::Rng;

use crate::{
    game::{self, GameState, Intent},
    persistence::{self, Snapshot, Storage},
};

/// Owns the game state of a session and keeps its saved data current
#[derive_where(Debug)]
pub struct Store<S: Storage> {
    state: GameState,
    #[derive_where(skip)]
    storage: S,
    rng: Rng,
    saved: Snapshot,
}

impl<S: Storage> Store<S> {
    /// Opens a store over `storage`, restoring any saved data
    pub fn open(storage: S) -> Self {
        Self::with_rng(storage, Rng::new())
    }

    /// Like [`Store::open`] with a fixed shuffle seed
    pub fn with_seed(storage: S, seed: u64) -> Self {
        Self::with_rng(storage, Rng::with_seed(seed))
    }

    fn with_rng(storage: S, mut rng: Rng) -> Self {
        let mut state = GameState::new();
        if let Some(snapshot) = persistence::load(&storage) {
            if let Err(error) = state.apply(Intent::LoadSavedData(snapshot), &mut rng) {
                tracing::warn!(%error, "could not restore saved data");
            }
        }
        let saved = state.snapshot();
        Self {
            state,
            storage,
            rng,
            saved,
        }
    }

    /// The current state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The backing storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Closes the store, handing back its storage
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Applies `intent` and saves if the persisted subset changed
    ///
    /// Save failures are logged and otherwise ignored; the in-memory state
    /// stays authoritative and the next change retries the write.
    ///
    /// # Errors
    ///
    /// Returns the reason the intent was rejected, in which case the state
    /// is unchanged and nothing is saved.
    pub fn dispatch(&mut self, intent: Intent) -> Result<&GameState, game::Error> {
        if let Err(error) = self.state.apply(intent, &mut self.rng) {
            tracing::warn!(%error, "rejected intent");
            return Err(error);
        }
        self.persist();
        Ok(&self.state)
    }

    fn persist(&mut self) {
        let snapshot = self.state.snapshot();
        if snapshot == self.saved {
            return;
        }
        match persistence::save(&mut self.storage, &snapshot) {
            Ok(()) => {
                tracing::debug!("saved game data");
                self.saved = snapshot;
            }
            Err(error) => tracing::warn!(%error, "could not save game data"),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{
        card::{Card, Difficulty},
        catalog::CategoryRecord,
        persistence::{FileStorage, KEY, MemoryStorage},
        settings::GameSettingsPatch,
        teams::{TEAM_COLORS, Team},
    };

    #[derive(Default)]
    struct FailingStorage {
        writes: usize,
    }

    impl Storage for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, persistence::Error> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), persistence::Error> {
            self.writes += 1;
            Err(std::io::Error::other("disk full").into())
        }
    }

    fn customize(store: &mut Store<impl Storage>) {
        store
            .dispatch(Intent::UpdateSettings(GameSettingsPatch {
                time_limit: Some(120),
                ..GameSettingsPatch::default()
            }))
            .unwrap();
        store
            .dispatch(Intent::CreateCustomCategory(CategoryRecord::new(
                "Board Games",
                "",
                "🎲",
                "",
            )))
            .unwrap();
        store
            .dispatch(Intent::AddCardToCategory {
                category_name: "Board Games".into(),
                card: Card::new("Chess", Difficulty::Medium, None, ""),
            })
            .unwrap();
    }

    #[test]
    fn test_fresh_store_has_defaults() {
        let store = Store::with_seed(MemoryStorage::new(), 1);
        assert_eq!(store.state(), &GameState::new());
        assert!(store.storage().get(KEY).unwrap().is_none());
    }

    #[test]
    fn test_changes_are_saved_and_restored() {
        let mut store = Store::with_seed(MemoryStorage::new(), 1);
        customize(&mut store);
        let expected = store.state().snapshot();

        let reopened = Store::with_seed(store.into_storage(), 2);
        assert_eq!(reopened.state().snapshot(), expected);
        assert_eq!(reopened.state().game_settings().time_limit, 120);
    }

    #[test]
    fn test_restored_across_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::with_seed(FileStorage::new(dir.path()), 1);
        customize(&mut store);
        let expected = store.state().snapshot();
        drop(store);

        let reopened = Store::open(FileStorage::new(dir.path()));
        assert_eq!(reopened.state().snapshot(), expected);
    }

    #[test]
    fn test_session_fields_are_not_saved() {
        let mut store = Store::with_seed(MemoryStorage::new(), 1);
        store
            .dispatch(Intent::SetTeams(vec![
                Team::new("A", vec!["p1".into()], TEAM_COLORS[0]),
                Team::new("B", vec!["p2".into()], TEAM_COLORS[1]),
            ]))
            .unwrap();
        store
            .dispatch(Intent::SetCategories(vec!["Actions".into()]))
            .unwrap();
        store.dispatch(Intent::StartGame).unwrap();
        // nothing persisted changed
        assert!(store.storage().get(KEY).unwrap().is_none());

        let reopened = Store::with_seed(store.into_storage(), 1);
        assert!(reopened.state().teams().is_empty());
        assert!(!reopened.state().game_started());
    }

    #[test]
    fn test_rejected_intent_is_not_saved() {
        let mut store = Store::with_seed(MemoryStorage::new(), 1);
        let result = store.dispatch(Intent::CreateCustomCategory(CategoryRecord::new(
            "Movies", "", "", "",
        )));
        assert!(matches!(result, Err(game::Error::BuiltInCategory(_))));
        assert!(store.storage().get(KEY).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_saved_data_falls_back_to_defaults() {
        let mut storage = MemoryStorage::new();
        storage.set(KEY, "][").unwrap();
        let store = Store::with_seed(storage, 1);
        assert_eq!(store.state(), &GameState::new());
    }

    #[test]
    fn test_save_failure_keeps_state() {
        let mut store = Store::with_seed(FailingStorage::default(), 1);
        store.dispatch(Intent::AdminLogin).unwrap();
        store
            .dispatch(Intent::AddCustomCard(Card::new(
                "Kazoo",
                Difficulty::Easy,
                None,
                "Custom",
            )))
            .unwrap();
        assert_eq!(store.state().custom_cards().len(), 1);
        assert_eq!(store.storage().writes, 1);

        // still unsaved, so the next change retries
        store.dispatch(Intent::FinishGame).unwrap();
        assert_eq!(store.storage().writes, 2);
    }
}
