use satintin_common::EnvVars;

pub struct ApiServerEnv {
    pub database_url: String,
    pub asset_service_url: String,
    pub user_service_url: String,
    pub card_service_url: String,
    pub port: u16,
}

impl EnvVars for ApiServerEnv {
    const REQUIRED: &'static [&'static str] = &[
        "DATABASE_URL",
        "ASSET_SERVICE_URL",
        "USER_SERVICE_URL",
        "CARD_SERVICE_URL",
    ];

    fn load() -> Self {
        Self {
            database_url: Self::required("DATABASE_URL"),
            asset_service_url: Self::required("ASSET_SERVICE_URL"),
            user_service_url: Self::required("USER_SERVICE_URL"),
            card_service_url: Self::required("CARD_SERVICE_URL"),
            port: Self::optional("PORT", "10011")
                .parse()
                .expect("PORT must be a number"),
        }
    }
}
