//! GraphQL documents sent to the Storefront API.
//!
//! Fragments are plain string constants; every operation that spreads a
//! fragment appends the fragment's definition (and those it depends on) with
//! `concat!`, so each document is a single `&'static str`.

macro_rules! image_fragment {
    () => {
        r"
fragment image on Image {
  url
  altText
  width
  height
}
"
    };
}

macro_rules! seo_fragment {
    () => {
        r"
fragment seo on SEO {
  title
  description
}
"
    };
}

macro_rules! collection_fragment {
    () => {
        r"
fragment collection on Collection {
  id
  handle
  title
  description
  image {
    ...image
  }
  products(first: 1) {
    edges {
      node {
        productType
      }
    }
  }
  seo {
    ...seo
  }
}
"
    };
}

macro_rules! product_fragment {
    () => {
        r"
fragment product on Product {
  id
  handle
  title
  vendor
  totalInventory
  availableForSale
  description
  descriptionHtml
  createdAt
  productType
  options {
    name
    values
  }
  variants(first: 250) {
    edges {
      node {
        id
        quantityAvailable
        availableForSale
        title
        selectedOptions {
          name
          value
        }
        image {
          ...image
        }
        price {
          amount
          currencyCode
        }
        compareAtPrice {
          amount
          currencyCode
        }
      }
    }
  }
  images(first: 10) {
    edges {
      node {
        ...image
      }
    }
  }
  collections(first: 10) {
    edges {
      node {
        ...collection
      }
    }
  }
  featuredImage {
    ...image
  }
  seo {
    ...seo
  }
}
"
    };
}

macro_rules! cart_fragment {
    () => {
        r"
fragment cart on Cart {
  id
  checkoutUrl
  totalQuantity
  cost {
    subtotalAmount {
      amount
      currencyCode
    }
    totalAmount {
      amount
      currencyCode
    }
    totalTaxAmount {
      amount
      currencyCode
    }
  }
  lines(first: 100) {
    edges {
      node {
        id
        quantity
        cost {
          totalAmount {
            amount
            currencyCode
          }
          amountPerQuantity {
            amount
            currencyCode
          }
        }
        merchandise {
          ... on ProductVariant {
            id
            title
            selectedOptions {
              name
              value
            }
            product {
              id
              handle
              title
              featuredImage {
                ...image
              }
            }
          }
        }
      }
    }
  }
}
"
    };
}

macro_rules! page_fragment {
    () => {
        r"
fragment page on Page {
  id
  handle
  title
  body
  bodySummary
  seo {
    ...seo
  }
  createdAt
  updatedAt
}
"
    };
}

macro_rules! filters_selection {
    () => {
        r"
filters {
  id
  label
  type
  values {
    id
    count
    input
    label
  }
}
"
    };
}

pub const GET_PRODUCTS: &str = concat!(
    r"
query AllProducts(
  $sortKey: ProductSortKeys
  $first: Int
  $last: Int
  $query: String
  $after: String
  $before: String
  $reverse: Boolean
) {
  products(
    reverse: $reverse
    sortKey: $sortKey
    first: $first
    last: $last
    query: $query
    after: $after
    before: $before
  ) {
    pageInfo {
      hasNextPage
      hasPreviousPage
      endCursor
      startCursor
    }
    edges {
      node {
        ...product
      }
    }
  }
}
",
    product_fragment!(),
    image_fragment!(),
    seo_fragment!(),
    collection_fragment!(),
);

pub const GET_COLLECTION_PRODUCTS: &str = concat!(
    r"
query getCollectionProducts(
  $handle: String!
  $sortKey: ProductCollectionSortKeys
  $filters: [ProductFilter!]
  $first: Int
  $last: Int
  $after: String
  $before: String
  $reverse: Boolean
) {
  collection(handle: $handle) {
    products(
      before: $before
      after: $after
      last: $last
      first: $first
      sortKey: $sortKey
      filters: $filters
      reverse: $reverse
    ) {
      pageInfo {
        hasNextPage
        hasPreviousPage
        endCursor
        startCursor
      }
",
    filters_selection!(),
    r"
      edges {
        node {
          ...product
        }
      }
    }
  }
}
",
    product_fragment!(),
    image_fragment!(),
    seo_fragment!(),
    collection_fragment!(),
);

pub const SEARCH_PRODUCTS: &str = concat!(
    r"
query SearchProducts(
  $sortKey: SearchSortKeys
  $first: Int
  $last: Int
  $after: String
  $before: String
  $filters: [ProductFilter!]
  $query: String!
  $reverse: Boolean
) {
  search(
    sortKey: $sortKey
    first: $first
    last: $last
    query: $query
    after: $after
    before: $before
    types: [PRODUCT]
    productFilters: $filters
    reverse: $reverse
  ) {
    totalCount
    productFilters {
      id
      label
      type
      values {
        id
        count
        input
        label
      }
    }
    pageInfo {
      hasNextPage
      hasPreviousPage
      endCursor
      startCursor
    }
    edges {
      node {
        ... on Product {
          ...product
        }
      }
    }
  }
}
",
    product_fragment!(),
    image_fragment!(),
    seo_fragment!(),
    collection_fragment!(),
);

pub const GET_PRODUCT: &str = concat!(
    r"
query GetProduct($handle: String!) {
  product(handle: $handle) {
    ...product
  }
}
",
    product_fragment!(),
    image_fragment!(),
    seo_fragment!(),
    collection_fragment!(),
);

pub const GET_RELATED_PRODUCTS: &str = concat!(
    r"
query RelatedProducts($handle: String!) {
  productRecommendations(productHandle: $handle, intent: RELATED) {
    ...product
  }
}
",
    product_fragment!(),
    image_fragment!(),
    seo_fragment!(),
    collection_fragment!(),
);

pub const GET_COLLECTIONS: &str = concat!(
    r"
query getCollections {
  collections(first: 250) {
    edges {
      node {
        ...collection
      }
    }
  }
}
",
    collection_fragment!(),
    image_fragment!(),
    seo_fragment!(),
);

pub const GET_FILTERS: &str = concat!(
    r"
query getFilters($handle: String!) {
  collection(handle: $handle) {
    products(first: 1) {
",
    filters_selection!(),
    r"
    }
  }
}
",
);

pub const GET_PRODUCT_META: &str = r"
query AllOptions($first: Int!, $after: String) {
  products(first: $first, after: $after) {
    pageInfo {
      hasNextPage
      endCursor
    }
    edges {
      node {
        productType
        vendor
        options {
          name
          values
        }
      }
    }
  }
}
";

pub const GET_SHOP: &str = concat!(
    r"
query getShop {
  shop {
    name
    brand {
      colors {
        primary {
          background
          foreground
        }
        secondary {
          background
          foreground
        }
      }
      logo {
        image {
          ...image
        }
      }
    }
    primaryDomain {
      url
    }
  }
}
",
    image_fragment!(),
);

pub const GET_CART: &str = concat!(
    r"
query getCart($cartId: ID!) {
  cart(id: $cartId) {
    ...cart
  }
}
",
    cart_fragment!(),
    image_fragment!(),
);

pub const CREATE_CART: &str = concat!(
    r"
mutation createCart($lines: [CartLineInput!]) {
  cartCreate(input: { lines: $lines }) {
    cart {
      ...cart
    }
    userErrors {
      field
      message
    }
  }
}
",
    cart_fragment!(),
    image_fragment!(),
);

pub const ADD_TO_CART: &str = concat!(
    r"
mutation addToCart($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart {
      ...cart
    }
    userErrors {
      field
      message
    }
  }
}
",
    cart_fragment!(),
    image_fragment!(),
);

pub const EDIT_CART_ITEMS: &str = concat!(
    r"
mutation editCartItems($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart {
      ...cart
    }
    userErrors {
      field
      message
    }
  }
}
",
    cart_fragment!(),
    image_fragment!(),
);

pub const REMOVE_FROM_CART: &str = concat!(
    r"
mutation removeFromCart($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart {
      ...cart
    }
    userErrors {
      field
      message
    }
  }
}
",
    cart_fragment!(),
    image_fragment!(),
);

macro_rules! mailing_address_fragment {
    () => {
        r"
fragment mailingAddress on MailingAddress {
  id
  address1
  address2
  city
  country
}
"
    };
}

pub const GET_MENU: &str = r"
query getMenu($handle: String!) {
  menu(handle: $handle) {
    items {
      title
      url
      items {
        title
        url
      }
    }
  }
}
";

pub const GET_PAGE: &str = concat!(
    r"
query getPage($handle: String!) {
  pageByHandle(handle: $handle) {
    ...page
  }
}
",
    page_fragment!(),
    seo_fragment!(),
);

pub const GET_PAGES: &str = concat!(
    r"
query getPages {
  pages(first: 100) {
    edges {
      node {
        ...page
      }
    }
  }
}
",
    page_fragment!(),
    seo_fragment!(),
);

pub const GET_METAOBJECTS: &str = concat!(
    r"
query getMetaobjects($type: String!) {
  metaobjects(type: $type, first: 250) {
    edges {
      node {
        type
        handle
        fields {
          key
          type
          value
          reference {
            ... on MediaImage {
              image {
                ...image
              }
            }
          }
        }
      }
    }
  }
}
",
    image_fragment!(),
);

pub const CUSTOMER_CREATE: &str = r"
mutation customerCreate($input: CustomerCreateInput!) {
  customerCreate(input: $input) {
    customer {
      firstName
      lastName
      email
      phone
      acceptsMarketing
    }
    customerUserErrors {
      code
      field
      message
    }
  }
}
";

pub const CUSTOMER_ACCESS_TOKEN_CREATE: &str = r"
mutation customerAccessTokenCreate($input: CustomerAccessTokenCreateInput!) {
  customerAccessTokenCreate(input: $input) {
    customerAccessToken {
      accessToken
      expiresAt
    }
    customerUserErrors {
      code
      field
      message
    }
  }
}
";

pub const CUSTOMER_RECOVER: &str = r"
mutation customerRecover($email: String!) {
  customerRecover(email: $email) {
    customerUserErrors {
      code
      field
      message
    }
  }
}
";

pub const GET_CUSTOMER: &str = concat!(
    r"
query getCustomer($customerAccessToken: String!) {
  customer(customerAccessToken: $customerAccessToken) {
    id
    email
    firstName
    lastName
    phone
    defaultAddress {
      ...mailingAddress
    }
    addresses(first: 250) {
      edges {
        node {
          ...mailingAddress
        }
      }
    }
    orders(first: 250, sortKey: PROCESSED_AT, reverse: true) {
      edges {
        node {
          orderNumber
          processedAt
          financialStatus
          customerUrl
          currentSubtotalPrice {
            amount
            currencyCode
          }
          currentTotalPrice {
            amount
            currencyCode
          }
          currentTotalShippingPrice {
            amount
            currencyCode
          }
          currentTotalTax {
            amount
            currencyCode
          }
          lineItems(first: 250) {
            edges {
              node {
                title
                currentQuantity
                discountedTotalPrice {
                  amount
                  currencyCode
                }
                variant {
                  id
                  title
                  quantityAvailable
                  availableForSale
                  selectedOptions {
                    name
                    value
                  }
                  image {
                    ...image
                  }
                  price {
                    amount
                    currencyCode
                  }
                  compareAtPrice {
                    amount
                    currencyCode
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}
",
    mailing_address_fragment!(),
    image_fragment!(),
);

pub const CUSTOMER_ADDRESS_CREATE: &str = concat!(
    r"
mutation customerAddressCreate($customerAccessToken: String!, $address: MailingAddressInput!) {
  customerAddressCreate(customerAccessToken: $customerAccessToken, address: $address) {
    customerAddress {
      ...mailingAddress
    }
    customerUserErrors {
      code
      field
      message
    }
  }
}
",
    mailing_address_fragment!(),
);

pub const CUSTOMER_ADDRESS_UPDATE: &str = concat!(
    r"
mutation customerAddressUpdate($customerAccessToken: String!, $id: ID!, $address: MailingAddressInput!) {
  customerAddressUpdate(customerAccessToken: $customerAccessToken, id: $id, address: $address) {
    customerAddress {
      ...mailingAddress
    }
    customerUserErrors {
      code
      field
      message
    }
  }
}
",
    mailing_address_fragment!(),
);

pub const CUSTOMER_ADDRESS_DELETE: &str = r"
mutation customerAddressDelete($customerAccessToken: String!, $id: ID!) {
  customerAddressDelete(customerAccessToken: $customerAccessToken, id: $id) {
    deletedCustomerAddressId
    customerUserErrors {
      code
      field
      message
    }
  }
}
";

pub const CUSTOMER_DEFAULT_ADDRESS_UPDATE: &str = concat!(
    r"
mutation customerDefaultAddressUpdate($customerAccessToken: String!, $addressId: ID!) {
  customerDefaultAddressUpdate(customerAccessToken: $customerAccessToken, addressId: $addressId) {
    customer {
      defaultAddress {
        ...mailingAddress
      }
    }
    customerUserErrors {
      code
      field
      message
    }
  }
}
",
    mailing_address_fragment!(),
);
