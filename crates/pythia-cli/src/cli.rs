use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use pythia::codec::PythiaDecode;
use pythia::{
    BlindedPassword, BlindingSecret, DeblindedPassword, Proof, PythiaContext, ServerSecrets,
    TransformationPublicKey, TransformedPassword, TransformedTweak, UpdateToken,
};
use rand_core::OsRng;
use serde::Serialize;

use crate::config::ConfigFile;

#[derive(Parser, Debug)]
#[command(name = "pythia-cli")]
#[command(about = "Verifiable partially-oblivious password hardening")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[arg(long, value_enum, env("PYTHIA_LOG_FORMAT"), default_value = "plain")]
    pub log_format: LogFormat,
    /// Path to pythia.yaml
    #[arg(long, global = true, env("PYTHIA_CONFIG"))]
    pub config: Option<PathBuf>,
    #[clap(subcommand)]
    pub command: CliCommand,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Plaintext logs
    Plain,
    /// JSON logs
    Json,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Blinds a password on the client
    Blind {
        #[arg(long)]
        password: String,
    },
    /// Evaluates the PRF on a blinded password
    #[command(alias = "eval")]
    Transform {
        #[arg(long, value_parser = parse_hex::<BlindedPassword>)]
        blinded_password: BlindedPassword,
        #[arg(long)]
        tweak: String,
        #[command(flatten)]
        secrets: SecretArgs,
    },
    /// Removes the blinding from a transformed password
    Deblind {
        #[arg(long, value_parser = parse_hex::<TransformedPassword>)]
        transformed_password: TransformedPassword,
        #[arg(long, value_parser = parse_hex::<BlindingSecret>)]
        blinding_secret: BlindingSecret,
    },
    /// Proves that a transformed password was computed with the server key
    Prove {
        #[arg(long, value_parser = parse_hex::<TransformedPassword>)]
        transformed_password: TransformedPassword,
        #[arg(long, value_parser = parse_hex::<BlindedPassword>)]
        blinded_password: BlindedPassword,
        #[arg(long)]
        tweak: String,
        #[command(flatten)]
        secrets: SecretArgs,
    },
    /// Checks a transformation proof
    Verify {
        #[arg(long, value_parser = parse_hex::<TransformedPassword>)]
        transformed_password: TransformedPassword,
        #[arg(long, value_parser = parse_hex::<BlindedPassword>)]
        blinded_password: BlindedPassword,
        #[arg(long)]
        tweak: String,
        #[arg(long, value_parser = parse_hex::<TransformationPublicKey>)]
        public_key: TransformationPublicKey,
        #[arg(long, value_parser = parse_hex::<pythia::Scalar>)]
        c: pythia::Scalar,
        #[arg(long, value_parser = parse_hex::<pythia::Scalar>)]
        u: pythia::Scalar,
    },
    /// Derives the token moving stored passwords from the `--config` secrets
    /// to the `--new-config` secrets
    #[command(alias = "get-password-update-token")]
    Rotate {
        #[arg(long)]
        new_config: PathBuf,
    },
    /// Applies an update token to a deblinded password
    Update {
        #[arg(long, value_parser = parse_hex::<DeblindedPassword>)]
        deblinded_password: DeblindedPassword,
        #[arg(long, value_parser = parse_hex::<UpdateToken>)]
        update_token: UpdateToken,
    },
}

/// Server secrets, taken from the environment or the flags below and
/// falling back to the `secrets` section of the config file.
#[derive(Args, Debug, Default)]
pub struct SecretArgs {
    #[arg(long, env("PYTHIA_TRANSFORMATION_KEY_ID"))]
    pub transformation_key_id: Option<String>,
    #[arg(long, env("PYTHIA_SECRET"), hide_env_values = true)]
    pub pythia_secret: Option<String>,
    #[arg(long, env("PYTHIA_SCOPE_SECRET"), hide_env_values = true)]
    pub pythia_scope_secret: Option<String>,
}

impl SecretArgs {
    pub fn resolve(&self, config: &ConfigFile) -> anyhow::Result<ServerSecrets> {
        let file = config.secrets.as_ref();
        let key_id = self
            .transformation_key_id
            .as_deref()
            .or(file.map(|s| s.transformation_key_id.as_str()))
            .context("missing transformation key id")?;
        let secret = self
            .pythia_secret
            .as_deref()
            .or(file.map(|s| s.pythia_secret.as_str()))
            .context("missing pythia secret")?;
        let scope_secret = self
            .pythia_scope_secret
            .as_deref()
            .or(file.map(|s| s.pythia_scope_secret.as_str()))
            .context("missing pythia scope secret")?;
        Ok(ServerSecrets::new(
            key_id.as_bytes(),
            secret.as_bytes(),
            scope_secret.as_bytes(),
        ))
    }
}

fn parse_hex<T: PythiaDecode>(value: &str) -> anyhow::Result<T> {
    let bytes = hex::decode(value).context("value is not valid hex")?;
    Ok(T::from_bytes(&bytes)?)
}

#[derive(Serialize)]
struct BlindOutput {
    blinded_password: BlindedPassword,
    blinding_secret: BlindingSecret,
}

#[derive(Serialize)]
struct TransformOutput {
    transformed_password: TransformedPassword,
    transformed_tweak: TransformedTweak,
}

#[derive(Serialize)]
struct DeblindedOutput {
    deblinded_password: DeblindedPassword,
}

#[derive(Serialize)]
struct VerifyOutput {
    verified: bool,
}

impl Cli {
    pub fn load_config(&self) -> anyhow::Result<ConfigFile> {
        match &self.config {
            Some(path) => ConfigFile::from_file(path),
            None => Ok(ConfigFile::default()),
        }
    }

    pub fn run(
        &self,
        context: &PythiaContext,
        config: &ConfigFile,
    ) -> anyhow::Result<serde_json::Value> {
        let output = match &self.command {
            CliCommand::Blind { password } => {
                let blinding = context.blind(password.as_bytes(), &mut OsRng)?;
                serde_json::to_value(BlindOutput {
                    blinded_password: blinding.blinded_password,
                    blinding_secret: blinding.blinding_secret,
                })?
            }
            CliCommand::Transform {
                blinded_password,
                tweak,
                secrets,
            } => {
                let secrets = secrets.resolve(config)?;
                let transformation =
                    context.transform(blinded_password, tweak.as_bytes(), &secrets)?;
                serde_json::to_value(TransformOutput {
                    transformed_password: transformation.transformed_password,
                    transformed_tweak: transformation.transformed_tweak,
                })?
            }
            CliCommand::Deblind {
                transformed_password,
                blinding_secret,
            } => {
                let deblinded_password = context.deblind(transformed_password, blinding_secret)?;
                serde_json::to_value(DeblindedOutput { deblinded_password })?
            }
            CliCommand::Prove {
                transformed_password,
                blinded_password,
                tweak,
                secrets,
            } => {
                let secrets = secrets.resolve(config)?;
                let private_key = secrets.transformation_key()?;
                let transformed_tweak =
                    TransformedTweak::from(context.hash_tweak(tweak.as_bytes()));
                let proof = context.prove(
                    transformed_password,
                    blinded_password,
                    &transformed_tweak,
                    &private_key,
                    &mut OsRng,
                )?;
                serde_json::to_value(proof)?
            }
            CliCommand::Verify {
                transformed_password,
                blinded_password,
                tweak,
                public_key,
                c,
                u,
            } => {
                let proof = Proof {
                    public_key: *public_key,
                    c: *c,
                    u: *u,
                };
                let verified = context.verify(
                    transformed_password,
                    blinded_password,
                    tweak.as_bytes(),
                    &proof,
                )?;
                serde_json::to_value(VerifyOutput { verified })?
            }
            CliCommand::Rotate { new_config } => {
                let old = SecretArgs::default()
                    .resolve(config)
                    .context("--config must hold the current secrets")?;
                let new_config = ConfigFile::from_file(new_config)?;
                let new = SecretArgs::default()
                    .resolve(&new_config)
                    .context("--new-config must hold the new secrets")?;
                serde_json::to_value(context.rotate(&old, &new)?)?
            }
            CliCommand::Update {
                deblinded_password,
                update_token,
            } => {
                let deblinded_password = context.apply_update(deblinded_password, update_token)?;
                serde_json::to_value(DeblindedOutput { deblinded_password })?
            }
        };
        tracing::info!(command = self.command.name(), "command completed");
        Ok(output)
    }
}

impl CliCommand {
    fn name(&self) -> &'static str {
        match self {
            CliCommand::Blind { .. } => "blind",
            CliCommand::Transform { .. } => "transform",
            CliCommand::Deblind { .. } => "deblind",
            CliCommand::Prove { .. } => "prove",
            CliCommand::Verify { .. } => "verify",
            CliCommand::Rotate { .. } => "rotate",
            CliCommand::Update { .. } => "update",
        }
    }
}
