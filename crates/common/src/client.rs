/// Connection lifecycle shared by every external-service client.
///
/// `setup_connection` panics on misconfiguration: a client that cannot
/// reach its backing service at boot is a deployment error, not a
/// runtime condition to paper over.
#[async_trait::async_trait]
pub trait ModuleClient: Clone + Send + Sync + 'static {
    const NAME: &'static str;
    type Client;

    async fn setup_connection() -> Self;

    fn get_client(&self) -> &Self::Client;
}
