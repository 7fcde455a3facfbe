//! Loading state for one remote resource.
//!
//! Each request is tagged with the generation returned by [`Remote::begin`].
//! A response only lands if no newer request was started in the meantime, so
//! a slow reply can never overwrite fresher data.

#[derive(Debug, Clone)]
pub struct Remote<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    generation: u64,
    patched: bool,
}

impl<T> Default for Remote<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            generation: 0,
            patched: false,
        }
    }
}

impl<T> Remote<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request and returns the generation to tag it with.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Applies a response. Returns `false` and changes nothing when the
    /// response belongs to an older request.
    pub fn resolve(&mut self, generation: u64, result: Result<T, String>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.patched = false;
            }
            Err(message) => self.set_error(message),
        }
        true
    }

    /// Ends the current request as failed, keeping whatever data is loaded.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.set_error(message.into());
    }

    fn set_error(&mut self, message: String) {
        self.error = Some(if message.trim().is_empty() {
            "Request failed".to_string()
        } else {
            message
        });
    }

    /// Optimistic local edit, kept until the next fetch replaces it.
    pub fn patch(&mut self, edit: impl FnOnce(&mut T)) {
        if let Some(data) = self.data.as_mut() {
            edit(data);
            self.patched = true;
        }
    }

    pub fn is_patched(&self) -> bool {
        self.patched
    }

    pub fn get(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn clear(&mut self) {
        *self = Self {
            generation: self.generation,
            ..Self::default()
        };
    }
}

impl<T> Remote<Vec<T>> {
    pub fn items(&self) -> &[T] {
        self.data.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_response_is_dropped() {
        let mut remote: Remote<Vec<u32>> = Remote::new();
        let first = remote.begin();
        let second = remote.begin();

        assert!(remote.resolve(second, Ok(vec![2])));
        assert!(!remote.resolve(first, Ok(vec![1])));
        assert_eq!(remote.items(), &[2]);
        assert!(!remote.loading);
    }

    #[test]
    fn failure_ends_loading_with_message() {
        let mut remote: Remote<u32> = Remote::new();
        let generation = remote.begin();
        assert!(remote.loading);
        remote.resolve(generation, Err(String::new()));
        assert!(!remote.loading);
        assert!(remote.error.as_deref().is_some_and(|e| !e.is_empty()));

        remote.begin();
        remote.fail("Failed to fetch earnings data");
        assert!(!remote.loading);
        assert_eq!(remote.error.as_deref(), Some("Failed to fetch earnings data"));
    }

    #[test]
    fn patch_marks_until_next_payload() {
        let mut remote: Remote<Vec<u32>> = Remote::new();
        let generation = remote.begin();
        remote.resolve(generation, Ok(vec![1, 2, 3]));

        remote.patch(|items| items.retain(|i| *i != 2));
        assert!(remote.is_patched());
        assert_eq!(remote.items(), &[1, 3]);

        let generation = remote.begin();
        remote.resolve(generation, Ok(vec![1, 2, 3]));
        assert!(!remote.is_patched());
        assert_eq!(remote.items(), &[1, 2, 3]);
    }

    #[test]
    fn patch_without_data_is_noop() {
        let mut remote: Remote<Vec<u32>> = Remote::new();
        remote.patch(|items| items.push(1));
        assert!(!remote.is_patched());
        assert!(remote.get().is_none());
    }
}
