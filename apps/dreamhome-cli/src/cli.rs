//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dreamhome_listing::FieldValue;

#[derive(Parser, Debug)]
#[command(name = "dreamhome", version, about = "Dream Home listing client", long_about = None)]
pub struct Cli {
    /// Overrides the configured API base URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account.
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Check credentials and show the account.
    Signin(Credentials),

    /// Upload images and publish a new listing.
    CreateListing(CreateListingArgs),

    /// Upload a profile picture.
    Avatar {
        #[command(flatten)]
        credentials: Credentials,
        image: PathBuf,
    },

    /// Print the configuration file location and contents.
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct Credentials {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct CreateListingArgs {
    #[command(flatten)]
    pub credentials: Credentials,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: String,

    #[arg(long)]
    pub address: String,

    /// `sale` or `rent`.
    #[arg(long = "type", default_value = "rent")]
    pub deal_type: String,

    #[arg(long)]
    pub parking: bool,

    #[arg(long)]
    pub furnished: bool,

    #[arg(long)]
    pub offer: bool,

    #[arg(long, default_value_t = 1)]
    pub bedrooms: u32,

    #[arg(long, default_value_t = 1)]
    pub bathrooms: u32,

    #[arg(long, default_value_t = 50.0)]
    pub regular_price: f64,

    #[arg(long, default_value_t = 0.0)]
    pub discount_price: f64,

    /// Image files, uploaded in the given order.
    #[arg(required = true)]
    pub images: Vec<PathBuf>,
}

impl CreateListingArgs {
    /// Draft field updates, keyed by form id.
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("name", self.name.as_str().into()),
            ("description", self.description.as_str().into()),
            ("address", self.address.as_str().into()),
            ("type", self.deal_type.as_str().into()),
            ("parking", self.parking.into()),
            ("furnished", self.furnished.into()),
            ("offer", self.offer.into()),
            ("bedrooms", self.bedrooms.into()),
            ("bathrooms", self.bathrooms.into()),
            ("regularPrice", self.regular_price.into()),
            ("discountPrice", self.discount_price.into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_listing_parses_fields_and_images() {
        let cli = Cli::try_parse_from([
            "dreamhome",
            "create-listing",
            "--email",
            "ana@example.com",
            "--password",
            "pw",
            "--name",
            "Sunny two-bed flat",
            "--description",
            "Near the park",
            "--address",
            "1 Main St",
            "--type",
            "sale",
            "--offer",
            "--regular-price",
            "1000",
            "--discount-price",
            "900",
            "a.jpg",
            "b.png",
        ])
        .unwrap();

        let Command::CreateListing(args) = cli.command else {
            panic!("expected create-listing");
        };
        assert_eq!(args.images, [PathBuf::from("a.jpg"), PathBuf::from("b.png")]);
        assert!(args.offer && !args.parking);

        let fields = args.fields();
        assert!(fields.contains(&("type", FieldValue::Text("sale".into()))));
        assert!(fields.contains(&("bedrooms", FieldValue::Number(1.0))));
        assert!(fields.contains(&("discountPrice", FieldValue::Number(900.0))));
    }

    #[test]
    fn create_listing_requires_images() {
        let err = Cli::try_parse_from([
            "dreamhome",
            "create-listing",
            "--email",
            "a@b.c",
            "--password",
            "pw",
            "--name",
            "n",
            "--description",
            "d",
            "--address",
            "a",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn global_api_url_after_subcommand() {
        let cli = Cli::try_parse_from(["dreamhome", "config", "--api-url", "http://api.test"])
            .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://api.test"));
        assert!(matches!(cli.command, Command::Config));
    }
}
