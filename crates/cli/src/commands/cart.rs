//! Interactive cart session.
//!
//! The cart is transient by design (it lives for one invocation), so this
//! command runs a small read-eval loop instead of one-shot subcommands.

use std::io::{BufRead, Write};

use green_papaya_core::ProductId;
use green_papaya_storefront::models::{CartLineInput, VariantKey};
use green_papaya_storefront::services::cart::CartStore;

use super::{App, CliError, bootstrap};

const HELP: &str = "\
commands:
  add <product-id> [color] [qty]   fetch the product and add it to the cart
  rm <product-id> [color]          remove a line
  inc <product-id> [color]         increase quantity by one
  dec <product-id> [color]         decrease quantity (floors at 1)
  sel <product-id> [color]         toggle line selection
  all <on|off>                     select or deselect every line
  show                             print the cart
  total                            print the selected subtotal
  close                            hide the cart panel
  help                             this text
  quit                             leave";

/// Run the interactive cart loop.
pub async fn interactive() -> Result<(), CliError> {
    let app = bootstrap()?;
    let cart = CartStore::new();

    // Stand-in for the reactive badge in the page header.
    let badge = cart.clone();
    cart.subscribe(move || {
        println!("cart updated: {} item(s)", badge.badge_count());
    });

    println!("interactive cart; type 'help' for commands");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("cart> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            [] => {}
            ["quit" | "exit"] => break,
            ["help"] => println!("{HELP}"),
            ["show"] => print_cart(&cart),
            ["total"] => println!("selected subtotal: {}", cart.selected_total()),
            ["close"] => cart.close(),
            ["add", id, rest @ ..] => add(&app, &cart, id, rest).await?,
            ["rm", id, rest @ ..] => cart.remove_item(&ProductId::new(*id), &variant(rest)),
            ["inc", id, rest @ ..] => cart.increase_quantity(&ProductId::new(*id), &variant(rest)),
            ["dec", id, rest @ ..] => cart.decrease_quantity(&ProductId::new(*id), &variant(rest)),
            ["sel", id, rest @ ..] => cart.toggle_select(&ProductId::new(*id), &variant(rest)),
            ["all", "on"] => cart.select_all(true),
            ["all", "off"] => cart.select_all(false),
            _ => println!("unrecognized command; type 'help'"),
        }
    }

    Ok(())
}

/// Fetch the product and add it to the cart.
///
/// `rest` is `[color]`, `[qty]`, or `[color, qty]`.
async fn add(app: &App, cart: &CartStore, id: &str, rest: &[&str]) -> Result<(), CliError> {
    let (color, quantity) = match *rest {
        [] => (None, 1),
        [arg] => match arg.parse::<u32>() {
            Ok(quantity) => (None, quantity),
            Err(_) => (Some(arg.to_owned()), 1),
        },
        [color, qty, ..] => (Some(color.to_owned()), qty.parse::<u32>().unwrap_or(1)),
    };

    let product = match app.api.get_product(&ProductId::new(id)).await {
        Ok(product) => product,
        Err(e) => {
            // Keep the loop alive on bad IDs; only the lookup failed.
            println!("cannot add: {e}");
            return Ok(());
        }
    };

    let variant = VariantKey {
        color,
        size: None,
    };
    cart.add_item(CartLineInput::from_product(&product, variant, quantity));

    Ok(())
}

fn variant(rest: &[&str]) -> VariantKey {
    match rest.first() {
        Some(color) => VariantKey::color(*color),
        None => VariantKey::none(),
    }
}

fn print_cart(cart: &CartStore) {
    let lines = cart.lines();
    if lines.is_empty() {
        println!("cart is empty");
        return;
    }

    for line in &lines {
        println!(
            "[{}] {:<24} {:<12} x{:<3} {:>10}  ({})",
            if line.selected { "x" } else { " " },
            line.display_name,
            line.variant.to_string(),
            line.quantity,
            line.line_total().to_string(),
            line.product_id,
        );
    }
    println!(
        "{} item(s), selected subtotal {}",
        cart.badge_count(),
        cart.selected_total()
    );
}
