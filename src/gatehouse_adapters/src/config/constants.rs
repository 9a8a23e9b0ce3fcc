pub mod env {
    pub const ENV_PREFIX: &str = "GATEHOUSE";
    pub const CONFIG_FILE: &str = "config/gatehouse";
}

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub const TOKEN_SECRET: &str = "gatehouse-test-secret-with-enough-entropy";
}
