//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// Keys present in `section`, sorted. Empty when the section is absent.
    fn get_keys(&self, section: &str) -> Vec<String>;

    /// Comma-separated value split into trimmed tokens. Empty tokens are kept
    /// so validation can reject them.
    fn get_list(&self, section: &str, key: &str) -> Option<Vec<String>> {
        self.get_string(section, key)
            .map(|raw| raw.split(',').map(|t| t.trim().to_string()).collect())
    }
}
