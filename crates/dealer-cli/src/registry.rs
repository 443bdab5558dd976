//! Name to handler table for the flat command namespace.

use std::collections::BTreeMap;

use crate::commands::{CommandFactory, CommandHandler};

/// Registered commands, ordered by name.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, CommandFactory>,
}

impl CommandRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the protected built-ins plus the domain table.
    /// Called once per run, so no state carries over between invocations.
    #[must_use]
    pub fn build<P, D>(protected: P, domain: D) -> Self
    where
        P: IntoIterator<Item = (&'static str, CommandFactory)>,
        D: IntoIterator<Item = (&'static str, CommandFactory)>,
    {
        let mut registry = Self::new();
        registry.register_all(protected);
        registry.register_all(domain);
        registry
    }

    /// Insert every pair; the last registration for a name wins.
    pub fn register_all<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = (&'static str, CommandFactory)>,
    {
        self.commands.extend(commands);
    }

    /// Remove every command whose name is not in `protected`.
    pub fn clear_except(&mut self, protected: &[&str]) {
        self.commands.retain(|name, _| protected.contains(name));
    }

    /// Look up a command, returning its registered name and a fresh handler.
    pub fn get(&self, name: &str) -> Option<(&'static str, Box<dyn CommandHandler>)> {
        self.commands
            .get_key_value(name)
            .map(|(name, make)| (*name, make()))
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// `(name, one-line description)` pairs, sorted by name.
    pub fn descriptions(&self) -> Vec<(&'static str, String)> {
        self.commands
            .iter()
            .map(|(name, make)| {
                let one_liner = make().description().lines().next().unwrap_or_default().to_string();
                (*name, one_liner)
            })
            .collect()
    }

    /// Every command name plus every global flag string, sorted and
    /// deduplicated. Never touches configuration or the network.
    pub fn list_for_completion(&self, global_flags: &[String]) -> Vec<String> {
        let mut words: Vec<String> = self
            .names()
            .map(str::to_string)
            .chain(global_flags.iter().cloned())
            .collect();
        words.sort();
        words.dedup();
        words
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.commands.keys()).finish()
    }
}
