// 🎁 Demo Data - the sample wedding used to explore the dashboard
//
// Ids are fresh on every call; table seat lists point at the guests built here.

use chrono::NaiveDate;

use crate::entities::{
    new_id, BudgetItem, Categories, Guest, Relation, Rsvp, Table, Task, Vendor,
};
use crate::persistence::{Settings, Snapshot};

const DEMO_TOTAL_BUDGET: f64 = 100_000.0;

fn guest(
    name: &str,
    phone: &str,
    relation: Relation,
    invited: u32,
    rsvp: Rsvp,
    notes: &str,
) -> Guest {
    Guest {
        id: new_id(),
        full_name: name.to_string(),
        phone_number: phone.to_string(),
        relation,
        invited_count: invited,
        confirmed: rsvp,
        special_notes: notes.to_string(),
    }
}

fn task(
    title: &str,
    description: &str,
    due: (i32, u32, u32),
    category: &str,
    completed: bool,
) -> Task {
    Task {
        id: new_id(),
        title: title.to_string(),
        description: description.to_string(),
        due_date: NaiveDate::from_ymd_opt(due.0, due.1, due.2),
        category: category.to_string(),
        assigned_to: String::new(),
        completed,
    }
}

fn budget_item(category: &str, description: &str, planned: f64, deposit: f64) -> BudgetItem {
    BudgetItem {
        id: new_id(),
        category: category.to_string(),
        description: description.to_string(),
        planned,
        deposit,
        actual: None,
        paid: false,
    }
}

fn vendor(name: &str, category: &str, phone: &str, price: f64, contact: &str) -> Vendor {
    Vendor {
        id: new_id(),
        name: name.to_string(),
        category: category.to_string(),
        phone: phone.to_string(),
        email: format!("{}@example.com", contact.to_lowercase()),
        website: String::new(),
        price,
        rating: 0,
        notes: format!("Contact: {}", contact),
    }
}

fn table(name: &str, capacity: u32, seated: &[&Guest]) -> Table {
    Table {
        id: new_id(),
        name: name.to_string(),
        capacity,
        guest_ids: seated.iter().map(|g| g.id.clone()).collect(),
    }
}

pub fn snapshot() -> Snapshot {
    let guests = vec![
        guest("David Cohen", "050-1234567", Relation::Family, 4, Rsvp::Yes, "Nut allergy"),
        guest("Rachel Levi", "052-7654321", Relation::Friends, 2, Rsvp::Maybe, ""),
        guest("Yossi Goldberg", "054-9876543", Relation::Work, 1, Rsvp::No, "Vegetarian"),
        guest("Sarah Abrahami", "053-1112222", Relation::Family, 3, Rsvp::Yes, ""),
        guest("Moshe David", "058-3334444", Relation::Friends, 2, Rsvp::Yes, "Wheelchair access"),
    ];

    let tasks = vec![
        task("Choose the dress", "Book fitting appointments", (2023, 8, 15), "preparations", true),
        task("Book a DJ", "Check references and sign", (2023, 9, 1), "vendors", false),
        task("Seating plan", "Plan guest seating", (2023, 10, 20), "planning", false),
        task("Order the cake", "Pick flavours and design", (2023, 9, 30), "vendors", false),
        task("Marriage registration", "Submit documents", (2023, 8, 30), "legal", true),
    ];

    let budget_items = vec![
        budget_item("hall", "Hall down payment", 20000.0, 10000.0),
        budget_item("catering", "Catering first payment", 30000.0, 15000.0),
        budget_item("bridal dress", "Dress deposit", 8000.0, 4000.0),
        budget_item("photographer", "Photographer deposit", 5000.0, 2500.0),
        budget_item("music", "DJ payment", 3000.0, 1500.0),
    ];

    let vendors = vec![
        vendor("Estate Hall", "hall", "03-1234567", 20000.0, "Sarah"),
        vendor("Yossi's Catering", "catering", "054-7654321", 30000.0, "Yossi"),
        vendor("Pro Photographers", "photography", "052-9876543", 5000.0, "Dana"),
        vendor("Rachel's Bridal", "bridal dress", "050-1112222", 8000.0, "Rachel"),
        vendor("DJ Alon", "music", "053-3334444", 3000.0, "Alon"),
    ];

    let tables = vec![
        table("Family 1", 10, &[&guests[0], &guests[3]]),
        table("Friends 1", 8, &[&guests[1], &guests[4]]),
        table("Work", 6, &[&guests[2]]),
        table("Family 2", 10, &[]),
        table("Friends 2", 8, &[]),
    ];

    let categories = Categories {
        budget: budget_items.iter().map(|item| item.category.as_str()).collect(),
        vendor: vendors.iter().map(|v| v.category.as_str()).collect(),
        task: tasks.iter().map(|t| t.category.as_str()).collect(),
    };

    Snapshot {
        guests,
        budget_items,
        vendors,
        tasks,
        tables,
        categories,
        settings: Settings {
            total_budget: DEMO_TOTAL_BUDGET,
        },
    }
}
