//! Catalog commands: list, categories, and search-as-you-type.

use std::fmt::Write as _;
use std::time::Duration;

use bazaar_core::{CatalogView, Favorites, FavoritesLedger, KeyValueStore, Product, category_label};
use bazaar_storefront::browse::CatalogBrowser;
use bazaar_storefront::catalog::CatalogClient;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{CommandError, print};

/// Prefix of a `browse` input line that selects a category.
const CATEGORY_COMMAND: &str = ":category";

/// `browse` input line that drops the search text.
const CLEAR_COMMAND: &str = ":clear";

/// One line per product: id, favorite marker, title, category, price.
pub fn format_products<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    favorites: &Favorites,
) -> String {
    let mut out = String::new();
    for product in products {
        let marker = if favorites.contains(product.id) { '♥' } else { ' ' };
        let _ = writeln!(
            out,
            "{:>4} {marker} {}  [{}]  ${}",
            product.id,
            product.title,
            category_label(&product.category),
            product.price.display(),
        );
    }

    if out.is_empty() {
        out.push_str("No products found. Try adjusting your search or filter criteria.\n");
    }
    out
}

/// List products matching `category` and `search`.
pub async fn list<S: KeyValueStore>(
    catalog: &CatalogClient,
    store: &S,
    category: &str,
    search: &str,
) -> Result<(), CommandError> {
    let favorites = FavoritesLedger::new(store).load().await?;
    let mut view = CatalogView::new(catalog.products().await?.to_vec());
    view.set_category(category);
    view.set_search_query(search);

    print(format_products(view.filtered(), &favorites).trim_end());
    Ok(())
}

/// List category values and their labels.
pub async fn categories(catalog: &CatalogClient) -> Result<(), CommandError> {
    let view = CatalogView::new(catalog.products().await?.to_vec());
    for category in view.categories() {
        print(format_args!("{category:<20} {}", category_label(category)));
    }
    Ok(())
}

/// Search interactively.
///
/// Each stdin line replaces the search text; results print once input has
/// been quiet for `quiet`. A line of the form `:category <name>` switches
/// category and `:clear` drops the search text; both print immediately.
pub async fn browse(catalog: &CatalogClient, quiet: Duration) -> Result<(), CommandError> {
    let browser = CatalogBrowser::new(CatalogView::new(catalog.products().await?.to_vec()), quiet);
    let settle = quiet + Duration::from_millis(10);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Some(category) = line.strip_prefix(CATEGORY_COMMAND) {
                    browser.select_category(category.trim());
                    print_visible(&browser);
                } else if line.trim() == CLEAR_COMMAND {
                    browser.clear_search();
                    print_visible(&browser);
                } else {
                    browser.search_input(line.trim());
                }
            }
            () = tokio::time::sleep(settle), if browser.search_pending() => {
                print_visible(&browser);
            }
        }
    }

    if browser.search_pending() {
        tokio::time::sleep(settle).await;
        print_visible(&browser);
    }
    Ok(())
}

fn print_visible(browser: &CatalogBrowser) {
    let category = browser.read(|view| view.category().as_str().to_string());
    let query = browser.applied_query();
    print(format_args!("-- {} / \"{query}\" --", category_label(&category)));
    print(format_products(&browser.visible(), &Favorites::new()).trim_end());
}
