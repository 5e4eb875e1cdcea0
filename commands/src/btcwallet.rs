//! Commands supported by a wallet server with btcwallet extensions.
//!
//! Every command here needs a wallet, so all of them are registered as `wallet-only`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use jsoncmd_schema::{Command, Field, ParamKind, ParamType, RegistryBuilder, UsageFlag};

/// `createnewaccount "account"`
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CreateNewAccountRequest {
    pub account: String,
}

impl CreateNewAccountRequest {
    pub fn new<S: Into<String>>(account: S) -> Self {
        Self {
            account: account.into(),
        }
    }
}

impl Command for CreateNewAccountRequest {
    fn fields() -> Vec<Field> {
        vec![Field::required::<String>("account")]
    }
}

/// `dumpwallet "filename"`
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DumpWalletRequest {
    pub filename: String,
}

impl DumpWalletRequest {
    pub fn new<S: Into<String>>(filename: S) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

impl Command for DumpWalletRequest {
    fn fields() -> Vec<Field> {
        vec![Field::required::<String>("filename")]
    }
}

/// `importaddress "address" "account" (rescan=true)`
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ImportAddressRequest {
    pub address: String,
    pub account: String,
    pub rescan: Option<bool>,
}

impl ImportAddressRequest {
    pub fn new<A: Into<String>, B: Into<String>>(
        address: A,
        account: B,
        rescan: Option<bool>,
    ) -> Self {
        Self {
            address: address.into(),
            account: account.into(),
            rescan,
        }
    }
}

impl Command for ImportAddressRequest {
    fn fields() -> Vec<Field> {
        vec![
            Field::required::<String>("address"),
            Field::required::<String>("account"),
            Field::optional::<bool>("rescan").with_default(true),
        ]
    }
}

/// `importpubkey "pubkey" (rescan=true)`
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ImportPubKeyRequest {
    pub pubkey: String,
    pub rescan: Option<bool>,
}

impl ImportPubKeyRequest {
    pub fn new<S: Into<String>>(pubkey: S, rescan: Option<bool>) -> Self {
        Self {
            pubkey: pubkey.into(),
            rescan,
        }
    }
}

impl Command for ImportPubKeyRequest {
    fn fields() -> Vec<Field> {
        vec![
            Field::required::<String>("pubkey"),
            Field::optional::<bool>("rescan").with_default(true),
        ]
    }
}

/// `importwallet "filename"`
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ImportWalletRequest {
    pub filename: String,
}

impl ImportWalletRequest {
    pub fn new<S: Into<String>>(filename: S) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

impl Command for ImportWalletRequest {
    fn fields() -> Vec<Field> {
        vec![Field::required::<String>("filename")]
    }
}

/// `renameaccount "old_account" "new_account"`
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RenameAccountRequest {
    pub old_account: String,
    pub new_account: String,
}

impl RenameAccountRequest {
    pub fn new<A: Into<String>, B: Into<String>>(old_account: A, new_account: B) -> Self {
        Self {
            old_account: old_account.into(),
            new_account: new_account.into(),
        }
    }
}

impl Command for RenameAccountRequest {
    fn fields() -> Vec<Field> {
        vec![
            Field::required::<String>("old_account"),
            Field::required::<String>("new_account"),
        ]
    }
}

/// An input to spend in the PSBT built by `walletcreatefundedpsbt`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct PsbtInput {
    pub txid: String,
    pub vout: i64,
    pub sequence: i64,
}

impl ParamKind for PsbtInput {
    fn param_type() -> ParamType {
        ParamType::Object
    }
}

/// An output of the PSBT built by `walletcreatefundedpsbt`: address to amount in BTC.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PsbtOutput(pub BTreeMap<String, f64>);

impl PsbtOutput {
    /// Output paying `amount` to `address`.
    pub fn new<S: Into<String>>(address: S, amount: f64) -> Self {
        let mut outputs = BTreeMap::new();
        outputs.insert(address.into(), amount);

        Self(outputs)
    }
}

impl ParamKind for PsbtOutput {
    fn param_type() -> ParamType {
        ParamType::Map(Box::new(ParamType::Float))
    }
}

/// Options object of `walletcreatefundedpsbt`. Unset options are left for the server to decide.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct WalletCreateFundedPsbtOpts {
    #[serde(rename = "changeAddress", skip_serializing_if = "Option::is_none")]
    pub change_address: Option<String>,
    #[serde(rename = "changePosition", skip_serializing_if = "Option::is_none")]
    pub change_position: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_type: Option<String>,
    #[serde(rename = "includeWatching", skip_serializing_if = "Option::is_none")]
    pub include_watching: Option<bool>,
    #[serde(rename = "lockUnspents", skip_serializing_if = "Option::is_none")]
    pub lock_unspents: Option<bool>,
    #[serde(rename = "feeRate", skip_serializing_if = "Option::is_none")]
    pub fee_rate: Option<i64>,
    #[serde(rename = "subtractFeeFromOutputs", skip_serializing_if = "Option::is_none")]
    pub subtract_fee_from_outputs: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaceable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conf_target: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate_mode: Option<String>,
}

impl ParamKind for WalletCreateFundedPsbtOpts {
    fn param_type() -> ParamType {
        ParamType::Object
    }
}

/// `walletcreatefundedpsbt [inputs,...] [outputs,...] (locktime {options} bip32_derivs=true)`
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct WalletCreateFundedPsbtRequest {
    pub inputs: Vec<PsbtInput>,
    pub outputs: Vec<PsbtOutput>,
    pub locktime: Option<i64>,
    pub options: Option<WalletCreateFundedPsbtOpts>,
    pub bip32_derivs: Option<bool>,
}

impl WalletCreateFundedPsbtRequest {
    pub fn new(
        inputs: Vec<PsbtInput>,
        outputs: Vec<PsbtOutput>,
        locktime: Option<i64>,
        options: Option<WalletCreateFundedPsbtOpts>,
        bip32_derivs: Option<bool>,
    ) -> Self {
        Self {
            inputs,
            outputs,
            locktime,
            options,
            bip32_derivs,
        }
    }
}

impl Command for WalletCreateFundedPsbtRequest {
    fn fields() -> Vec<Field> {
        vec![
            Field::required::<Vec<PsbtInput>>("inputs"),
            Field::required::<Vec<PsbtOutput>>("outputs"),
            Field::optional::<i64>("locktime"),
            Field::optional::<WalletCreateFundedPsbtOpts>("options"),
            Field::optional::<bool>("bip32_derivs").with_default(true),
        ]
    }
}

/// `walletprocesspsbt "psbt" (sign=true sighash_type="ALL" bip32_derivs=true)`
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct WalletProcessPsbtRequest {
    pub psbt: String,
    pub sign: Option<bool>,
    pub sighash_type: Option<String>,
    pub bip32_derivs: Option<bool>,
}

impl WalletProcessPsbtRequest {
    pub fn new<S: Into<String>>(
        psbt: S,
        sign: Option<bool>,
        sighash_type: Option<String>,
        bip32_derivs: Option<bool>,
    ) -> Self {
        Self {
            psbt: psbt.into(),
            sign,
            sighash_type,
            bip32_derivs,
        }
    }
}

impl Command for WalletProcessPsbtRequest {
    fn fields() -> Vec<Field> {
        vec![
            Field::required::<String>("psbt"),
            Field::optional::<bool>("sign").with_default(true),
            Field::optional::<String>("sighash_type").with_default("ALL"),
            Field::optional::<bool>("bip32_derivs").with_default(true),
        ]
    }
}

/// Register the btcwallet extension commands.
///
/// # Panics
///
/// Panics if any of these methods, or their request types, is already registered.
pub fn register(builder: &mut RegistryBuilder) {
    let flags = UsageFlag::WalletOnly;

    builder
        .must_register::<CreateNewAccountRequest>("createnewaccount", flags)
        .must_register::<DumpWalletRequest>("dumpwallet", flags)
        .must_register::<ImportAddressRequest>("importaddress", flags)
        .must_register::<ImportPubKeyRequest>("importpubkey", flags)
        .must_register::<ImportWalletRequest>("importwallet", flags)
        .must_register::<RenameAccountRequest>("renameaccount", flags)
        .must_register::<WalletCreateFundedPsbtRequest>("walletcreatefundedpsbt", flags)
        .must_register::<WalletProcessPsbtRequest>("walletprocesspsbt", flags);

    log::debug!("Registered btcwallet extension commands");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn options_skip_unset_members() {
        let opts = WalletCreateFundedPsbtOpts {
            change_position: Some(1),
            conf_target: Some(6),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({ "changePosition": 1, "conf_target": 6 })
        );
        assert_eq!(
            serde_json::to_value(WalletCreateFundedPsbtOpts::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn psbt_output_is_a_plain_map() {
        let output = PsbtOutput::new("1Address", 0.5);

        assert_eq!(serde_json::to_value(&output).unwrap(), json!({ "1Address": 0.5 }));
    }
}
