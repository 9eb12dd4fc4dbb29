mod refresh_pipeline;
mod screener_client_integration;
