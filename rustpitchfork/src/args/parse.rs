use anyhow::{Context, Result};
use ron::{error::SpannedError, extensions::Extensions, Options};
use serde::de::DeserializeOwned;

use super::CommandArgs;

/// Command line arguments joined into one RON struct expression.
pub struct RonArgs(String);

impl From<CommandArgs> for RonArgs {
    fn from(command_args: CommandArgs) -> Self {
        let joined = command_args.args.join(" ");
        let trimmed = joined.trim();

        // `seed: 42, model: (..)` is accepted as shorthand for `(seed: 42, ..)`
        if trimmed.starts_with('(') {
            Self(trimmed.to_owned())
        } else {
            Self(format!("({trimmed})"))
        }
    }
}

impl RonArgs {
    /// # Errors
    ///
    /// Fails with the path to the offending field and its position in the
    /// arguments if they do not describe a `D`.
    pub fn parse<D: DeserializeOwned>(&self, subcommand: &str) -> Result<D> {
        let mut de_ron = ron::Deserializer::from_str_with_options(&self.0, ron_options())
            .with_context(|| format!("Failed to read the {subcommand} arguments as RON."))?;

        let mut track = serde_path_to_error::Track::new();

        let result = D::deserialize(serde_path_to_error::Deserializer::new(
            &mut de_ron,
            &mut track,
        ));

        result
            .map_err(|err| describe(subcommand, &track.path(), &de_ron.span_error(err)))
            .with_context(|| format!("Failed to parse the {subcommand} subcommand arguments."))
    }
}

fn describe(
    subcommand: &str,
    path: &serde_path_to_error::Path,
    err: &SpannedError,
) -> anyhow::Error {
    if path.iter().next().is_some() {
        anyhow::anyhow!("{subcommand}.{path} @ ({}):\n{}", err.position, err.code)
    } else {
        anyhow::anyhow!("{subcommand}.* @ ({}):\n{}", err.position, err.code)
    }
}

fn ron_options() -> Options {
    Options::default()
        .with_default_extension(Extensions::IMPLICIT_SOME)
        .with_default_extension(Extensions::UNWRAP_NEWTYPES)
        .with_default_extension(Extensions::UNWRAP_VARIANT_NEWTYPES)
}
