//! # Interactive Shell
//!
//! Reads one command per line, runs it against the Register and prints the
//! response.
//!
//! ## Line Handling
//! ```text
//! tienda> product add X1 "Gaseosa 500ml" 10 50 5 1 --json
//!    │
//!    ▼
//! split_line ──► ["product","add","X1","Gaseosa 500ml","10","50","5","1","--json"]
//!    │
//!    ▼
//! ShellLine::try_parse_from  (clap, no binary name)
//!    │
//!    ├── parse error / help ──► printed, shell continues
//!    ▼
//! dispatch ──► Box<dyn Response> ──► render (text) or to_json (--json)
//!    │
//!    └── ApiError ──► "error [CODE]: message"  or  {"code": .., "message": ..}
//! ```
//!
//! `quit` (or end of input) releases every cart reservation before the
//! shell returns, so abandoned carts never hold stock.

use std::io::{self, BufRead, Write};

use chrono::Utc;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use tienda_core::MovementKind;
use tienda_store::{RecordStore, Register};

use crate::commands::client::ClientForm;
use crate::commands::product::ProductForm;
use crate::commands::{
    cart, cash, client, dashboard, join_words, product, sale, settings, tools, Response,
};
use crate::error::ApiError;

/// One parsed shell line.
#[derive(Debug, Parser)]
#[command(
    name = "tienda",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{subcommands}\n\nAdd --json to any command for JSON output."
)]
pub struct ShellLine {
    /// Print the response as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShellCommand {
    /// List products, optionally filtered by name or SKU
    Products { query: Vec<String> },
    /// Create, edit, delete or restock a product
    #[command(subcommand)]
    Product(ProductAction),
    /// Preview the price for a cost and margin
    Price { cost: String, margin: String },
    /// Product cards for selling
    Grid { query: Vec<String> },
    /// Show the cart
    Cart,
    /// Add one unit of a product to the cart
    Add { sku: String },
    /// Remove a product line from the cart
    Remove { sku: String },
    /// Empty the cart
    Clear,
    /// Finalize the sale
    Checkout,
    /// Sales history
    Sales,
    /// Show one sale
    Sale { id: String },
    /// List clients, optionally filtered
    Clients { term: Vec<String> },
    /// Add, edit or delete a client
    #[command(subcommand)]
    Client(ClientAction),
    /// Cash book; `cash in|out <amount> [description]` records a movement
    Cash {
        #[command(subcommand)]
        action: Option<CashAction>,
    },
    /// KPIs and charts
    Dashboard,
    /// Show or change store settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
    /// Break-even point: fixed costs, unit price, unit variable cost
    Breakeven {
        fixed: String,
        price: String,
        variable: String,
    },
    /// Profit simulation: units sold, unit price, unit variable cost, fixed costs
    Simulate {
        units: u32,
        price: String,
        variable: String,
        fixed: String,
    },
    /// Release the cart and leave
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Subcommand)]
pub enum ProductAction {
    /// product add <sku> <name> <cost> <margin> <stock> <min>
    Add(ProductForm),
    /// product edit <sku> <name> <cost> <margin> <stock> <min>
    Edit(ProductForm),
    /// product delete <sku>
    Delete { sku: String },
    /// product restock <sku> <qty>
    Restock { sku: String, qty: u32 },
}

#[derive(Debug, Subcommand)]
pub enum ClientAction {
    /// client add <dni> <name> [--phone P] [--email E]
    Add(ClientForm),
    /// client edit <id> <dni> <name> [--phone P] [--email E]
    Edit {
        id: String,
        #[command(flatten)]
        form: ClientForm,
    },
    /// client delete <id>
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum CashAction {
    /// Money entering the till
    In {
        amount: String,
        description: Vec<String>,
    },
    /// Money leaving the till
    Out {
        amount: String,
        description: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// settings name <store name>
    Name { value: Vec<String> },
    /// settings currency <symbol>
    Currency { value: String },
}

/// Whether the shell keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The interactive shell around a Register.
pub struct Shell<S: RecordStore> {
    register: Register<S>,
    json: bool,
}

impl<S: RecordStore> Shell<S> {
    /// `json` makes JSON the default for every line.
    pub fn new(register: Register<S>, json: bool) -> Self {
        Shell { register, json }
    }

    pub fn register(&self) -> &Register<S> {
        &self.register
    }

    pub fn into_register(self) -> Register<S> {
        self.register
    }

    /// Reads and executes lines until `quit` or end of input.
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> io::Result<()> {
        writeln!(out, "{}  (type `help` for commands)", self.register.settings().app_title())?;

        let mut lines = input.lines();
        loop {
            write!(out, "tienda> ")?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            if self.execute(&line?, &mut out)? == Flow::Quit {
                break;
            }
        }

        self.shutdown();
        Ok(())
    }

    /// Executes one line, writing its response or error to `out`.
    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        let tokens = match split_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_error(&err, self.json, out)?;
                return Ok(Flow::Continue);
            }
        };
        if tokens.is_empty() {
            return Ok(Flow::Continue);
        }

        let parsed = match ShellLine::try_parse_from(&tokens) {
            Ok(parsed) => parsed,
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) =>
            {
                writeln!(out, "{}", err.render().to_string().trim_end())?;
                return Ok(Flow::Continue);
            }
            Err(err) => {
                let rendered = err.render().to_string();
                let message = rendered.trim_start_matches("error: ").trim_end();
                let json = self.json || tokens.iter().any(|t| t == "--json");
                self.print_error(&ApiError::validation(message), json, out)?;
                return Ok(Flow::Continue);
            }
        };

        let json = self.json || parsed.json;
        if matches!(parsed.command, ShellCommand::Quit) {
            return Ok(Flow::Quit);
        }

        match self.dispatch(parsed.command) {
            Ok(response) => self.print_response(response.as_ref(), json, out)?,
            Err(err) => self.print_error(&err, json, out)?,
        }
        Ok(Flow::Continue)
    }

    /// Releases cart reservations. Called once when the shell stops.
    pub fn shutdown(&mut self) {
        if self.register.cart().is_empty() {
            return;
        }
        let units = self.register.totals().unit_count;
        self.register.clear_cart();
        info!(units, "Released cart reservations on exit");
    }

    fn dispatch(&mut self, command: ShellCommand) -> Result<Box<dyn Response>, ApiError> {
        debug!(?command, "Dispatching");
        let register = &mut self.register;

        let response: Box<dyn Response> = match command {
            // Catalog
            ShellCommand::Products { query } => Box::new(product::list_products(register, &join_words(&query))?),
            ShellCommand::Grid { query } => Box::new(product::product_grid(register, &join_words(&query))?),
            ShellCommand::Price { cost, margin } => Box::new(product::price_preview(&cost, &margin)),
            ShellCommand::Product(action) => match action {
                ProductAction::Add(form) => Box::new(product::create_product(register, form)?),
                ProductAction::Edit(form) => Box::new(product::update_product(register, form)?),
                ProductAction::Delete { sku } => Box::new(product::delete_product(register, &sku)?),
                ProductAction::Restock { sku, qty } => {
                    Box::new(product::restock_product(register, &sku, qty)?)
                }
            },

            // Cart and checkout
            ShellCommand::Cart => Box::new(cart::get_cart(register)),
            ShellCommand::Add { sku } => Box::new(cart::add_to_cart(register, &sku)?),
            ShellCommand::Remove { sku } => Box::new(cart::remove_from_cart(register, &sku)),
            ShellCommand::Clear => Box::new(cart::clear_cart(register)),
            ShellCommand::Checkout => Box::new(sale::checkout(register)?),
            ShellCommand::Sales => Box::new(sale::list_sales(register)),
            ShellCommand::Sale { id } => Box::new(sale::get_sale(register, &id)?),

            // Back office
            ShellCommand::Clients { term } => Box::new(client::list_clients(register, &join_words(&term))),
            ShellCommand::Client(action) => match action {
                ClientAction::Add(form) => Box::new(client::add_client(register, form)?),
                ClientAction::Edit { id, form } => Box::new(client::update_client(register, &id, form)?),
                ClientAction::Delete { id } => Box::new(client::delete_client(register, &id)?),
            },
            ShellCommand::Cash { action } => match action {
                None => Box::new(cash::cash_report(register)),
                Some(CashAction::In { amount, description }) => Box::new(cash::record_cash(
                    register,
                    MovementKind::In,
                    &amount,
                    &join_words(&description),
                )?),
                Some(CashAction::Out { amount, description }) => Box::new(cash::record_cash(
                    register,
                    MovementKind::Out,
                    &amount,
                    &join_words(&description),
                )?),
            },
            ShellCommand::Dashboard => Box::new(dashboard::dashboard(register, Utc::now().date_naive())?),
            ShellCommand::Settings { action } => match action {
                None => Box::new(settings::get_settings(register)),
                Some(SettingsAction::Name { value }) => {
                    Box::new(settings::set_store_name(register, &join_words(&value))?)
                }
                Some(SettingsAction::Currency { value }) => {
                    Box::new(settings::set_currency_symbol(register, &value)?)
                }
            },

            // Tools
            ShellCommand::Breakeven { fixed, price, variable } => {
                Box::new(tools::break_even(&fixed, &price, &variable)?)
            }
            ShellCommand::Simulate { units, price, variable, fixed } => {
                Box::new(tools::simulate(units, &price, &variable, &fixed)?)
            }

            ShellCommand::Quit => return Err(ApiError::internal("quit is handled by the shell")),
        };
        Ok(response)
    }

    fn print_response(&self, response: &dyn Response, json: bool, out: &mut impl Write) -> io::Result<()> {
        if !json {
            return writeln!(out, "{}", response.render(self.register.settings()));
        }
        match response.to_json() {
            Ok(text) => writeln!(out, "{}", text),
            Err(err) => self.print_error(&ApiError::internal(err.to_string()), true, out),
        }
    }

    fn print_error(&self, err: &ApiError, json: bool, out: &mut impl Write) -> io::Result<()> {
        if json {
            if let Ok(text) = serde_json::to_string(err) {
                return writeln!(out, "{}", text);
            }
        }
        writeln!(out, "error [{}]: {}", err.code, err.message)
    }
}

/// Splits a line into words. Double quotes group words and may be empty
/// (`""`); quotes are not kept.
pub fn split_line(line: &str) -> Result<Vec<String>, ApiError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_quotes {
        return Err(ApiError::validation("Unterminated quote"));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tienda_store::MemoryStore;

    fn shell() -> Shell<MemoryStore> {
        let mut shell = Shell::new(Register::open(MemoryStore::new()), false);
        run_line(&mut shell, r#"product add X1 "Gaseosa 500ml" 10 50 5 1"#);
        shell
    }

    fn run_line(shell: &mut Shell<MemoryStore>, line: &str) -> String {
        let mut out = Vec::new();
        shell.execute(line, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_split_line() {
        assert_eq!(
            split_line(r#"  product add X1 "Gaseosa 500ml"  10 "" "#).unwrap(),
            vec!["product", "add", "X1", "Gaseosa 500ml", "10", ""]
        );
        assert!(split_line("").unwrap().is_empty());
        assert!(split_line(r#"client add "Ana"#).is_err());
    }

    #[test]
    fn test_scenario_through_shell() {
        let mut shell = shell();
        run_line(&mut shell, "add X1");
        let cart = run_line(&mut shell, "add x1");
        assert!(cart.contains("S/. 41.77"));

        let receipt = run_line(&mut shell, "checkout");
        assert!(receipt.contains("SALE-"));
        assert_eq!(shell.register().sales().len(), 1);
        assert_eq!(shell.register().ledger().find_by_sku("X1").unwrap().stock, 3);
    }

    #[test]
    fn test_errors_are_printed_and_shell_continues() {
        let mut shell = shell();
        let mut out = Vec::new();
        let flow = shell.execute("add NOPE", &mut out).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "error [OUT_OF_STOCK]: Out of stock: NOPE\n"
        );

        assert!(run_line(&mut shell, "checkout").starts_with("error [EMPTY_CART]"));
        assert!(run_line(&mut shell, "frobnicate").starts_with("error [VALIDATION_ERROR]"));
        assert!(run_line(&mut shell, "product restock X1 many").starts_with("error [VALIDATION_ERROR]"));
    }

    #[test]
    fn test_json_flag() {
        let mut shell = shell();
        let text = run_line(&mut shell, "add X1 --json");
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["totals"]["total"], 2089);
        assert_eq!(json["lines"][0]["quantity"], 1);

        let text = run_line(&mut shell, "sale SALE-1 --json");
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[test]
    fn test_quit_releases_reservations() {
        let mut shell = shell();
        let input = "add X1\nadd X1\nquit\nadd X1\n";
        let mut out = Vec::new();
        shell.run(input.as_bytes(), &mut out).unwrap();

        let register = shell.into_register();
        assert!(register.cart().is_empty());
        assert_eq!(register.ledger().find_by_sku("X1").unwrap().stock, 5);
    }

    #[test]
    fn test_end_of_input_releases_reservations() {
        let mut shell = shell();
        shell.run("add X1\n".as_bytes(), Vec::new()).unwrap();
        assert_eq!(shell.register().ledger().find_by_sku("X1").unwrap().stock, 5);
    }

    #[test]
    fn test_help_lists_commands() {
        let mut shell = shell();
        let help = run_line(&mut shell, "help");
        assert!(help.contains("checkout"));
        assert!(help.contains("breakeven"));
    }

    #[test]
    fn test_back_office_commands() {
        let mut shell = shell();
        assert!(run_line(&mut shell, r#"client add 44556677 "Ana Torres" --phone 987654321"#).starts_with("Added client"));
        assert!(run_line(&mut shell, "clients ana").contains("Ana Torres"));
        assert!(run_line(&mut shell, "cash in 200 Fondo inicial").contains("Balance S/. 200.00"));
        assert!(run_line(&mut shell, r#"settings name "Bodega Ana""#).contains("ERP - Bodega Ana"));
        assert!(run_line(&mut shell, "dashboard").starts_with("ERP - Bodega Ana"));
        assert_eq!(run_line(&mut shell, "price 10 50"), "Price: S/. 17.70\n");
        assert!(run_line(&mut shell, "breakeven 1000 25 15").contains("100.00 units"));
        assert!(run_line(&mut shell, "simulate 200 25 15 1000").contains("(PROFIT)"));
    }
}
