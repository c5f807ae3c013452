/// Typed view over the environment variables one component consumes.
///
/// Every binary calls `T::load()` once at startup so that a missing
/// variable fails immediately instead of mid-request.
pub trait EnvVars: Sized {
    const REQUIRED: &'static [&'static str];

    fn load() -> Self;

    fn validate() -> bool {
        let missing = Self::REQUIRED
            .iter()
            .filter(|var| std::env::var(var).is_err())
            .collect::<Vec<_>>();

        if missing.is_empty() {
            return true;
        }

        tracing::error!("required environment variables are not set: {:?}", missing);
        false
    }

    fn required(key: &str) -> String {
        std::env::var(key).unwrap_or_else(|_| panic!("{} is not set", key))
    }

    fn optional(key: &str, default: &str) -> String {
        std::env::var(key).unwrap_or_else(|_| default.to_string())
    }
}
