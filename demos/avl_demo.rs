use avl_set::AvlTree;
use avl_set::logging::{self, LogConfig};
use log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(&LogConfig::from_env()?)?;

    let mut tree = AvlTree::new();
    for key in [10, 20, 30, 40, 50] {
        tree.insert(key);
    }
    info!("built tree of height {}", tree.height());

    print!("AVL Tree in order: ");
    tree.print_in_order()?;
    println!();

    let key_to_search = 30;
    if tree.search(key_to_search) {
        println!("The value {key_to_search} is present in the tree.");
    } else {
        println!("The value {key_to_search} is not present in the tree.");
    }

    let key_to_remove = 20;
    tree.remove(key_to_remove);
    println!("Value {key_to_remove} removed from the tree.");

    print!("Updated AVL Tree in order: ");
    tree.print_in_order()?;
    println!();

    Ok(())
}
