//! Demo menu for a fresh in-memory catalog.

use domain::{Category, DomainError, InMemoryCatalog, Money, Product};

/// Stock given to every seeded product.
pub const SEED_STOCK: i64 = 100;

const MENU: &[(&str, &[(&str, &str, i64)])] = &[
    (
        "burgers",
        &[
            ("Hambúrguer Clássico", "Pão, carne, alface, tomate e queijo", 1590),
            ("Hambúrguer Duplo", "Dois hambúrgueres, queijo, bacon e molho especial", 2250),
            ("X-Bacon", "Hambúrguer com bacon crocante e queijo", 1890),
            ("X-Salada", "Hambúrguer com salada completa", 1690),
        ],
    ),
    (
        "drinks",
        &[
            ("Refrigerante", "Coca-Cola, Pepsi ou Sprite", 500),
            ("Suco Natural", "Laranja, limão ou abacaxi", 650),
            ("Água", "Água mineral com ou sem gás", 350),
        ],
    ),
    (
        "sides",
        &[
            ("Batata Frita", "Porção de batatas fritas crocantes", 850),
            ("Onion Rings", "Anéis de cebola empanados", 790),
            ("Nuggets", "6 unidades de nuggets de frango", 990),
        ],
    ),
    (
        "desserts",
        &[
            ("Sorvete", "Sorvete de chocolate, baunilha ou morango", 450),
            ("Pudim", "Pudim de leite condensado", 590),
        ],
    ),
];

/// Loads the demo menu into `catalog`. Returns the number of products added.
pub async fn seed_menu(catalog: &InMemoryCatalog) -> Result<usize, DomainError> {
    let mut added = 0;
    for (category_name, items) in MENU {
        let category = Category::create(category_name)?;
        for (name, description, cents) in *items {
            let product = Product::create(
                name,
                *description,
                Money::from_cents(*cents),
                category.id(),
                SEED_STOCK,
            )?;
            catalog.add_product(product).await;
            added += 1;
        }
        catalog.add_category(category).await;
    }
    tracing::info!(products = added, "demo menu seeded");
    Ok(added)
}
