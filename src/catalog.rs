/// 静态产品目录
///
/// 目录是核心之外的协作方，这里只提供提交校验所需的最小查询；
/// 产品与用户、提交之间只靠字符串ID关联
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
}

pub const PRODUCTS: &[Product] = &[
    Product {
        id: "sams",
        name: "SAMS",
    },
    Product {
        id: "stigviewer",
        name: "STIG Viewer",
    },
    Product {
        id: "atlas",
        name: "Atlas",
    },
    Product {
        id: "relay",
        name: "Relay",
    },
];

pub fn exists(product_id: &str) -> bool {
    PRODUCTS.iter().any(|p| p.id == product_id)
}
