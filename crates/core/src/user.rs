//! Converter for the xmlapi2 `user` document (profile plus buddy list).

use serde::Serialize;

use crate::xml;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Buddy {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Upstream's own `total`/`page` are passed through verbatim; no pagination
/// happens on this side.
#[derive(Debug, Serialize, Clone, Default)]
pub struct BuddyList {
    pub total: Option<String>,
    pub page: Option<String>,
    pub buddy: Vec<Buddy>,
}

#[derive(Debug, Serialize, Clone)]
pub struct UserProfile {
    pub id: Option<String>,
    pub name: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub avatarlink: Option<String>,
    pub yearregistered: Option<String>,
    pub lastlogin: Option<String>,
    pub stateorprovince: Option<String>,
    pub country: Option<String>,
    pub traderating: Option<String>,
    pub buddies: BuddyList,
}

#[derive(Debug, Serialize, Clone)]
pub struct UserOutput {
    pub user: UserProfile,
}

pub fn convert_user(xml_data: &str) -> UserOutput {
    let doc = xml::parse(xml_data);
    let root = xml::root(&doc, "user");

    let mut buddies = BuddyList::default();
    if let Some(user) = root {
        if let Some(block) = user.select(&xml::selector("buddies")).next() {
            buddies.total = xml::attr(block, "total");
            buddies.page = xml::attr(block, "page");
            for buddy in block.select(&xml::selector("buddy")) {
                buddies.buddy.push(Buddy {
                    id: xml::attr(buddy, "id"),
                    name: xml::attr(buddy, "name"),
                });
            }
        }
    }

    let scalar = |tag: &str| root.and_then(|user| xml::value_attr(user, tag));

    UserOutput {
        user: UserProfile {
            id: root.and_then(|user| xml::attr(user, "id")),
            name: root.and_then(|user| xml::attr(user, "name")),
            firstname: scalar("firstname"),
            lastname: scalar("lastname"),
            avatarlink: scalar("avatarlink"),
            yearregistered: scalar("yearregistered"),
            lastlogin: scalar("lastlogin"),
            stateorprovince: scalar("stateorprovince"),
            country: scalar("country"),
            traderating: scalar("traderating"),
            buddies,
        },
    }
}
