//! Solidity surface of the DGN store contract.

use alloy_sol_types::sol;

sol! {
    function balanceOf(address account) external view returns (uint256);
    function owner() external view returns (address);
    function storeAddress() external view returns (address);
    function getAllNFTs() external view returns (string[] memory);
    function getUserNFTs() external view returns (string[] memory);
    function NFTs(string name) external view returns (string url, uint256 price, bool isAvailable);

    function mint(address to, uint256 amount) external;
    function burn(uint256 amount) external;
    function transfer(address to, uint256 amount) external returns (bool);
    function generateNFT(string name, string url, uint256 price) external;
    function redeem(string name) external;
    function setStoreAddress(address store) external;
}
