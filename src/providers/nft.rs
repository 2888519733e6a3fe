//! NFT collection facts: OpenSea `asset_contract` -> Reservoir `collections/v7`

use serde_json::Value;

use super::http::{field, primary_or_fallback, send_json};
use super::token::text;
use super::SourceContext;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Category, RawSignal};
use crate::utils::constants::json_u64;

pub async fn fetch_collection(ctx: &SourceContext, contract: &str) -> RawSignal {
    primary_or_fallback(
        "nft_collection",
        Category::Nft,
        "OpenSea",
        opensea_contract(ctx, contract),
        "Reservoir",
        reservoir_collection(ctx, contract),
    )
    .await
}

/// Any 2xx object answer means OpenSea knows the contract
pub async fn opensea_contract(ctx: &SourceContext, contract: &str) -> AppResult<RawSignal> {
    let url = format!("{}/api/v1/asset_contract/{}", ctx.endpoints.opensea, contract);
    let mut request = ctx.client.get(&url);
    if let Some(key) = ctx.keys.opensea.as_deref() {
        request = request.header("X-API-KEY", key);
    }
    let payload = send_json("OpenSea", request).await?;
    if !payload.is_object() {
        return Err(AppError::malformed("OpenSea answered a non-object payload"));
    }

    let collection = payload.get("collection").unwrap_or(&Value::Null);
    let stats = collection.get("stats").unwrap_or(&Value::Null);

    let verified = collection
        .get("safelist_request_status")
        .and_then(Value::as_str)
        .map(|status| status == "verified" || status == "approved")
        .unwrap_or(false);

    Ok(RawSignal {
        name: text(&payload, "name").or_else(|| text(collection, "name")),
        total_supply: text(&payload, "total_supply").or_else(|| text(stats, "total_supply")),
        holders: stats.get("num_owners").and_then(json_u64),
        verified: Some(verified),
        ..Default::default()
    })
}

async fn reservoir_collection(ctx: &SourceContext, contract: &str) -> AppResult<RawSignal> {
    let url = format!("{}/collections/v7", ctx.endpoints.reservoir);
    let request = ctx.client.get(&url).query(&[("id", contract)]);
    let payload = send_json("Reservoir", request).await?;

    let collection = field("Reservoir", &payload, "/collections/0")?;
    let verified = collection
        .get("openseaVerificationStatus")
        .and_then(Value::as_str)
        .map(|status| status == "verified" || status == "approved")
        .unwrap_or(false);

    Ok(RawSignal {
        name: text(collection, "name"),
        total_supply: text(collection, "tokenCount"),
        holders: collection.get("ownerCount").and_then(json_u64),
        verified: Some(verified),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::ctx_at;
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const AZUKI: &str = "0xED5AF388653567Af2F388E6224dC7C4b3241C544";

    #[tokio::test]
    async fn test_opensea_contract() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/asset_contract/{}", AZUKI)))
            .and(header("X-API-KEY", "os-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Azuki",
                "total_supply": "10000",
                "collection": {
                    "safelist_request_status": "verified",
                    "stats": { "num_owners": 4800 }
                }
            })))
            .mount(&server)
            .await;

        let mut ctx = ctx_at(&server.uri());
        ctx.keys.opensea = Some("os-key".to_string());
        let signal = fetch_collection(&ctx, AZUKI).await;

        assert_eq!(signal.name.as_deref(), Some("Azuki"));
        assert_eq!(signal.total_supply.as_deref(), Some("10000"));
        assert_eq!(signal.holders, Some(4800));
        assert_eq!(signal.verified, Some(true));
        assert_eq!(signal.source.as_deref(), Some("OpenSea"));
    }

    #[tokio::test]
    async fn test_reservoir_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections/v7"))
            .and(query_param("id", AZUKI))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "collections": [{
                    "name": "Azuki",
                    "tokenCount": "10000",
                    "ownerCount": 4700,
                    "openseaVerificationStatus": "not_requested"
                }]
            })))
            .mount(&server)
            .await;

        let signal = fetch_collection(&ctx_at(&server.uri()), AZUKI).await;
        assert_eq!(signal.verified, Some(false));
        assert_eq!(signal.holders, Some(4700));
        assert_eq!(signal.source.as_deref(), Some("Reservoir"));
    }

    #[tokio::test]
    async fn test_unknown_collection_degrades() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections/v7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "collections": [] })))
            .mount(&server)
            .await;

        let signal = fetch_collection(&ctx_at(&server.uri()), AZUKI).await;
        assert!(signal.unavailable);
        assert_eq!(signal.verified, None);
    }
}
