// Example: browse the demo listings, estimate shares, and see the
// validation messages a UI would surface.

use propshare_sdk::abi::shares_for_amount;
use propshare_sdk::config::format_eth;
use propshare_sdk::{demo_listings, validate_amount, InvestmentLimits};

fn main() {
    let limits = InvestmentLimits::default();

    println!("listings:");
    for property in demo_listings() {
        let price = property.share_price().expect("seeded listings have shares");
        println!(
            "  #{} {} ({}) — {} ETH across {} shares at {} ETH/share",
            property.id,
            property.name,
            property.location,
            format_eth(property.total_value),
            property.total_shares,
            format_eth(price),
        );
    }

    let listings = demo_listings();
    let manhattan = &listings[0];
    println!("\nentering amounts against the {} listing:", manhattan.name);
    for input in ["0.0001", "0.05", "0.000001", "0.2", "0", "ten eth"] {
        match validate_amount(input, &limits) {
            Ok(wei) => {
                let shares =
                    shares_for_amount(wei, manhattan.total_value, manhattan.total_shares)
                        .expect("listing has value");
                println!("  {input} ETH -> {shares} share(s)");
            }
            Err(err) => println!("  {input}: {err}"),
        }
    }
}
