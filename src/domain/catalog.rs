//! The menu shipped with the binary, used when no catalog file is given.

use super::models::{ItemId, Menu, MenuItem, Money};

const BUILTIN_ITEMS: &[(u32, &str, &str, u64, &str)] = &[
    (1, "Hyderabadi Chicken Biryani", "Authentic dum biryani with tender chicken and aromatic basmati rice", 1899, "Biryani"),
    (2, "Mutton Biryani", "Premium mutton pieces cooked with fragrant spices and saffron rice", 2299, "Biryani"),
    (3, "Hyderabadi Vegetable Biryani", "Mixed vegetables layered with aromatic basmati rice and dum cooked", 1599, "Biryani"),
    (4, "Fish Biryani", "Fresh fish marinated in spices and cooked with fragrant rice", 1999, "Biryani"),
    (5, "Prawn Biryani", "Succulent prawns with aromatic spices and basmati rice", 2199, "Biryani"),
    (6, "Mutton Marag", "Mutton curry with a rich, flavorful gravy", 2099, "Non-Veg"),
    (7, "Chicken Haleem", "Slow-cooked lentils with tender chicken", 1699, "Non-Veg"),
    (8, "Hyderabadi Chicken Korma", "Creamy chicken curry with cashews and aromatic spices", 1799, "Non-Veg"),
    (9, "Keema Kaleji", "Spiced minced mutton with liver", 1899, "Non-Veg"),
    (10, "Chicken Tikka Masala", "Tandoor grilled chicken in rich tomato-based curry", 1699, "Non-Veg"),
    (11, "Seekh Kebab", "Spiced minced mutton grilled on skewers", 1499, "Kebabs"),
    (12, "Chicken Tikka", "Marinated chicken chunks grilled in tandoor", 1599, "Kebabs"),
    (13, "Shammi Kebab", "Soft mutton patties with spices", 1399, "Kebabs"),
    (14, "Boti Kebab", "Tender mutton pieces marinated and grilled", 1799, "Kebabs"),
    (15, "Fish Tikka", "Fresh fish marinated in tandoori spices and grilled", 1699, "Kebabs"),
    (16, "Paneer Butter Masala", "Soft cottage cheese in rich tomato gravy", 1399, "Vegetarian"),
    (17, "Dal Hyderabadi", "Lentil curry with aromatic tempering", 999, "Vegetarian"),
    (18, "Bagara Baingan", "Stuffed eggplant curry", 1299, "Vegetarian"),
    (19, "Aloo Gosht Style Aloo", "Spiced potatoes cooked in rich gravy", 1099, "Vegetarian"),
    (20, "Mixed Vegetable Curry", "Seasonal vegetables in aromatic spices", 1199, "Vegetarian"),
    (21, "Hyderabadi Pulao", "Fragrant rice cooked with whole spices and ghee", 899, "Rice"),
    (22, "Roomali Roti", "Paper-thin handkerchief bread", 399, "Breads"),
    (23, "Hyderabadi Naan", "Soft leavened bread baked in tandoor", 499, "Breads"),
    (24, "Kulcha", "Stuffed bread with spiced filling", 599, "Breads"),
    (25, "Double Ka Meetha", "Bread pudding with nuts and saffron", 799, "Desserts"),
    (26, "Khubani Ka Meetha", "Apricot dessert with cream", 899, "Desserts"),
    (27, "Sheer Khurma", "Vermicelli pudding with dates and nuts", 699, "Desserts"),
    (28, "Qubani Ka Meetha with Ice Cream", "Apricot dessert served with vanilla ice cream", 999, "Desserts"),
    (29, "Kulfi Falooda", "Ice cream with vermicelli and rose syrup", 799, "Desserts"),
    (30, "Gulab Jamun", "Milk dumplings in cardamom flavored syrup", 599, "Desserts"),
    (31, "Hyderabadi Chai", "Spiced tea with cardamom and ginger", 299, "Beverages"),
    (32, "Lassi", "Yogurt drink, sweet or salted", 499, "Beverages"),
    (33, "Fresh Lime Water", "Lime juice with mint and spices", 399, "Beverages"),
];

pub fn builtin_menu() -> Menu {
    let items = BUILTIN_ITEMS
        .iter()
        .map(|&(id, name, description, cents, category)| MenuItem {
            id: ItemId(id),
            name: name.to_string(),
            description: description.to_string(),
            price: Money::from_cents(cents),
            category: category.to_string(),
        })
        .collect();
    Menu::from_trusted(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_menu_is_valid() {
        let menu = builtin_menu();
        assert_eq!(Menu::new(menu.items().to_vec()).as_ref(), Ok(&menu));
        assert_eq!(menu.len(), 33);
        assert_eq!(menu.get(ItemId(1)).unwrap().price.to_string(), "$18.99");
        assert_eq!(menu.get(ItemId(33)).unwrap().category, "Beverages");
    }
}
