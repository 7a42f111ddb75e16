use async_trait::async_trait;
use chrono::Utc;
use ethers::abi::{self, ParamType, Token};
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{transaction::eip2718::TypedTransaction, Address, Bytes, TransactionRequest, U256};
use ethers::utils::id;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{AppError, FeedError};
use crate::oracle::{FeedData, FeedDirectory, PriceOracle};

/// Decoded return of `latestRoundData()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RoundData {
    round_id: u128,
    answer: i128,
    started_at: i64,
    updated_at: i64,
    answered_in_round: u128,
}

/// Reads AggregatorV3 feeds over plain `eth_call` against a JSON-RPC node.
pub struct ChainlinkOracle {
    provider: Provider<Http>,
    directory: FeedDirectory,
}

impl ChainlinkOracle {
    pub fn new(rpc_url: &str, directory_url: &str) -> Result<Self, AppError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| AppError::Config(format!("Invalid ETH_RPC_URL {rpc_url}: {e}")))?;

        Ok(Self {
            provider,
            directory: FeedDirectory::new(directory_url),
        })
    }

    /// Zero-argument view call, returning the raw ABI-encoded result.
    async fn eth_call(&self, to: Address, signature: &str) -> Result<Vec<u8>, FeedError> {
        let data = Bytes::from(id(signature).to_vec());
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        debug!("eth_call {:?} {}", to, signature);
        let raw = self.provider.call(&tx, None).await?;
        Ok(raw.to_vec())
    }
}

#[async_trait]
impl PriceOracle for ChainlinkOracle {
    async fn resolve_feed_address(&self, symbol: &str) -> Result<Address, FeedError> {
        let address = self.directory.resolve(symbol).await?;
        info!("✅ Resolved feed {} -> {:?}", symbol, address);
        Ok(address)
    }

    async fn get_feed_data(&self, address: Address) -> Result<FeedData, FeedError> {
        let decimals = decode_decimals(&self.eth_call(address, "decimals()").await?)?;
        let description = decode_description(&self.eth_call(address, "description()").await?)?;
        let round = decode_round_data(&self.eth_call(address, "latestRoundData()").await?)?;

        let price = scale_answer(round.answer, decimals)?;
        info!(
            "📈 {} = {} (round {}, updated {})",
            description, price, round.round_id, round.updated_at
        );

        Ok(FeedData {
            feed: format!("{:?}", address),
            description,
            decimals,
            round_id: round.round_id,
            answer: round.answer.to_string(),
            price,
            started_at: round.started_at,
            updated_at: round.updated_at,
            answered_in_round: round.answered_in_round,
            fetched_at: Utc::now(),
        })
    }
}

fn decode_round_data(raw: &[u8]) -> Result<RoundData, FeedError> {
    let tokens = abi::decode(
        &[
            ParamType::Uint(80),
            ParamType::Int(256),
            ParamType::Uint(256),
            ParamType::Uint(256),
            ParamType::Uint(80),
        ],
        raw,
    )?;

    match tokens.as_slice() {
        [Token::Uint(round_id), Token::Int(answer), Token::Uint(started_at), Token::Uint(updated_at), Token::Uint(answered_in_round)] => {
            Ok(RoundData {
                round_id: uint_to_u128(*round_id)?,
                answer: int256_to_i128(*answer)?,
                started_at: uint_to_i64(*started_at)?,
                updated_at: uint_to_i64(*updated_at)?,
                answered_in_round: uint_to_u128(*answered_in_round)?,
            })
        }
        _ => Err(FeedError::MalformedRoundData(
            "unexpected latestRoundData layout".to_string(),
        )),
    }
}

fn decode_decimals(raw: &[u8]) -> Result<u8, FeedError> {
    let tokens = abi::decode(&[ParamType::Uint(8)], raw)?;
    match tokens.as_slice() {
        [Token::Uint(value)] if *value <= U256::from(u8::MAX as u64) => Ok(value.as_u32() as u8),
        _ => Err(FeedError::MalformedRoundData(
            "unexpected decimals() return".to_string(),
        )),
    }
}

fn decode_description(raw: &[u8]) -> Result<String, FeedError> {
    let tokens = abi::decode(&[ParamType::String], raw)?;
    match tokens.into_iter().next() {
        Some(Token::String(value)) => Ok(value),
        _ => Err(FeedError::MalformedRoundData(
            "unexpected description() return".to_string(),
        )),
    }
}

/// Scale a raw answer by the feed's decimals, e.g. 180050000000 @ 8 -> 1800.5
fn scale_answer(answer: i128, decimals: u8) -> Result<Decimal, FeedError> {
    Decimal::try_from_i128_with_scale(answer, decimals as u32)
        .map_err(|e| FeedError::MalformedRoundData(format!("answer out of range: {e}")))
}

/// Two's-complement int256 into i128. Feed answers are far below the limit;
/// anything outside is malformed data.
fn int256_to_i128(value: U256) -> Result<i128, FeedError> {
    if value.bit(255) {
        let magnitude = (!value).overflowing_add(U256::one()).0;
        if magnitude > U256::from(i128::MAX as u128) + U256::one() {
            return Err(FeedError::MalformedRoundData(
                "int256 answer below i128 range".to_string(),
            ));
        }
        Ok((magnitude.as_u128() as i128).wrapping_neg())
    } else {
        if value > U256::from(i128::MAX as u128) {
            return Err(FeedError::MalformedRoundData(
                "int256 answer above i128 range".to_string(),
            ));
        }
        Ok(value.as_u128() as i128)
    }
}

fn uint_to_u128(value: U256) -> Result<u128, FeedError> {
    if value > U256::from(u128::MAX) {
        return Err(FeedError::MalformedRoundData(
            "uint out of u128 range".to_string(),
        ));
    }
    Ok(value.as_u128())
}

fn uint_to_i64(value: U256) -> Result<i64, FeedError> {
    if value > U256::from(i64::MAX as u64) {
        return Err(FeedError::MalformedRoundData(
            "timestamp out of i64 range".to_string(),
        ));
    }
    Ok(value.as_u64() as i64)
}
