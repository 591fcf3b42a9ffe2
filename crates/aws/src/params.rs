//! Parameter Store configuration loading.

use std::collections::HashMap;

use aws_sdk_ssm::Client;

use crate::retry::with_transport_retry;

#[derive(Debug, thiserror::Error)]
#[error("Parameter Store request failed: {0}")]
pub struct ParamsError(pub String);

/// Fetch every parameter under `path`, decrypted, following pagination.
///
/// Names are flattened relative to the path, so with path
/// `/database-monitor/database` the parameter
/// `/database-monitor/database/cognito/user_pool_id` comes back under the
/// key `cognito_user_pool_id`.
pub async fn load_parameters(
    client: &Client,
    path: &str,
) -> Result<HashMap<String, String>, ParamsError> {
    let mut parameters = HashMap::new();
    let mut next_token: Option<String> = None;

    loop {
        let page = with_transport_retry("ssm.get_parameters_by_path", || {
            let mut req = client
                .get_parameters_by_path()
                .path(path)
                .recursive(true)
                .with_decryption(true);
            if let Some(token) = &next_token {
                req = req.next_token(token);
            }
            req.send()
        })
        .await
        .map_err(|e| ParamsError(e.to_string()))?;

        for param in page.parameters() {
            let (Some(name), Some(value)) = (param.name(), param.value()) else {
                continue;
            };
            parameters.insert(flatten_name(name, path), value.to_string());
        }

        next_token = page.next_token().map(str::to_string);
        if next_token.is_none() {
            break;
        }
    }

    // Values may be secrets, so only the count is logged.
    tracing::info!(
        path,
        param_count = parameters.len(),
        "loaded configuration from Parameter Store"
    );
    Ok(parameters)
}

/// As [`load_parameters`], constructing a one-off client for `region`.
///
/// Settings resolution runs before the shared client set exists, so this
/// builds its own.
pub async fn load_parameters_from_region(
    region: &str,
    path: &str,
) -> Result<HashMap<String, String>, ParamsError> {
    let config = crate::clients::sdk_config(region).await;
    let client = Client::new(&config);
    load_parameters(&client, path).await
}

fn flatten_name(name: &str, path: &str) -> String {
    name.replace(path, "")
        .trim_start_matches('/')
        .replace('/', "_")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_nested_parameter_names() {
        assert_eq!(
            flatten_name(
                "/database-monitor/database/cognito/user_pool_id",
                "/database-monitor/database"
            ),
            "cognito_user_pool_id"
        );
    }

    #[test]
    fn flattens_top_level_parameter_names() {
        assert_eq!(
            flatten_name("/database-monitor/database/database_url", "/database-monitor/database"),
            "database_url"
        );
    }
}
