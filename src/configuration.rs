pub trait Configuration: Clone + Send + Sync + 'static {
    fn host(&self) -> String;
    fn port(&self) -> String;
    /// `None` selects the in-memory store.
    fn database_url(&self) -> Option<String>;
}
